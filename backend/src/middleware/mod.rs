pub mod auth;
pub mod request_tracing;

pub use auth::AuthenticatedUser;
pub use request_tracing::RequestTracing;
