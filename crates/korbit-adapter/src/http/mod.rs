/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: Classified JSON payloads from public and private endpoints
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod fiat;
pub mod public;
pub mod user;
pub mod wallet;

pub use error::{ErrorKind, KorbitError, Result};

pub use client::{ClientConfig, KorbitClient, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub(crate) use client::warning_text;
