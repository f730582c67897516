pub mod guards;
pub mod token;

pub use guards::{authorize, Guard};
pub use token::{sign_token, verify_token, Claims, TokenError};
