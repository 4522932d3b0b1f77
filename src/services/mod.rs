//! Service layer: the generative-language client and everything built on it.

pub mod fetcher;
pub mod gemini_client;
pub mod json_locator;
pub mod prompts;
pub mod schemes;
pub mod selection;

pub use fetcher::StructuredFetcher;
pub use gemini_client::GeminiClient;
pub use schemes::SchemeService;
pub use selection::{SelectionSessions, SessionLimits};
