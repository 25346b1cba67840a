pub mod auth;
pub mod password;

pub use auth::{seed_admin, AuthService};
pub use password::PasswordService;
