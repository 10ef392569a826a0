pub mod services;

pub use services::auth::AuthService;
