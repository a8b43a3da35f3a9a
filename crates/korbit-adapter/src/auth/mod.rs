/*
[INPUT]:  OAuth2 client credentials and user login
[OUTPUT]: Access/refresh tokens, request nonces, and auth errors
[POS]:    Auth layer - handles Korbit API authentication
[UPDATE]: When auth flow or nonce format changes
*/

pub mod credentials;
pub mod manager;
pub mod nonce;
pub mod token;

pub use credentials::Credentials;
pub use manager::{ACCESS_TOKEN_PATH, AuthManager, GrantType, TokenResponse};
pub use nonce::{Nonce, NonceGenerator};
pub use token::{TokenState, TokenStore};
