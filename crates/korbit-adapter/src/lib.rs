/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Korbit adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthManager,
    Credentials,
    GrantType,
    Nonce,
    NonceGenerator,
    TokenResponse,
    TokenState,
    TokenStore,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ErrorKind,
    KorbitClient,
    KorbitError,
    PRODUCTION_BASE_URL,
    Result,
    SANDBOX_BASE_URL,
};

// Re-export all types
pub use types::*;
