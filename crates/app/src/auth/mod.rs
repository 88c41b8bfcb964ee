//! Authentication

mod errors;
mod models;
mod password;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use password::PASSWORD_LENGTH;
pub use service::*;
pub use token::*;
