//! API response wrappers shared by all routes

pub mod response;

pub use response::{Created, DataResponse, NoContent};
