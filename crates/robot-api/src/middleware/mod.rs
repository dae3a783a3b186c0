//! Middleware stack for the robot API.
//!
//! Layer order: Request → CORS (when configured) → Tracing → Auth → Body limit → Handler

pub mod auth;
pub mod cors;
pub mod tracing;

pub use auth::AuthLayer;
pub use cors::create_cors_layer;
pub use tracing::TracingLayer;
