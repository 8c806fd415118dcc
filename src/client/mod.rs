//! Client-side data layer for the proxy's REST surface.
//!
//! # Data Flow
//! ```text
//! dashboard / task-cli
//!     → api.rs (one method per proxy route, logged before sending)
//!     → proxy
//!     → error.rs (any failure normalized to ClientError)
//! ```

pub mod api;
pub mod error;

pub use api::{ApiClient, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
