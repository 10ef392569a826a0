pub mod auth;
pub mod error;
pub mod page;

pub use auth::{AuthRequest, AuthResponse, Identity, TokenClaims};
pub use error::AppError;
pub use page::Page;
