//! Domain types for the scheme browser

pub mod lenient;
pub mod schemes;

pub use schemes::*;
