//! HTTP adapter for the login endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::LoginRequest;
pub use handlers::{login, LoginHandlers};
pub use routes::login_routes;
