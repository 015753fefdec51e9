//! Lookup HTTP API using Axum.
//!
//! Provides endpoints for:
//! - MSISDN lookup (/lookup as text, /api/lookup as JSON)
//! - Directory listing and editing (/countries, /operators)
//! - Directory reload (/directory/reload)
//! - Health checks (/healthz, /livez, /readyz)
//! - Stats (/stats) and metrics (/metrics)

mod handlers;
mod render;
mod server;

pub use handlers::{LookupRequest, LookupResponse};
pub use render::{render_lines, render_text, ERROR_LINE};
pub use server::{ApiServer, ApiState, DirectoryChange, ReloadResult};
