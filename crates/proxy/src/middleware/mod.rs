//! HTTP middleware stack for the proxy.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (reuse or generate, forward upstream, echo back)
//! 4. CORS (tower-http, permissive or allow-list; answers every `OPTIONS`)

pub mod cors;
pub mod request_id;

pub use cors::{apply_cors, create_cors_layer};
pub use request_id::request_id_middleware;
