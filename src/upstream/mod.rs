//! Upstream service subsystem.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → request.rs (UpstreamRequest: method, segments, query, JSON body)
//!     → client.rs (resolve against base URL, send with deadline)
//!     → 2xx: Payload (JSON, or raw text when not JSON)
//!     → otherwise: error.rs (UpstreamError with preserved status code)
//! ```
//!
//! # Design Decisions
//! - Handlers see the `Upstream` trait, injected through router state
//! - The upstream status code is kept as data so callers branch on it
//! - No retries; every call surfaces once

pub mod client;
pub mod error;
pub mod request;

pub use client::{HttpUpstream, SharedUpstream, Upstream};
pub use error::{UpstreamError, UpstreamResult};
pub use request::{Payload, UpstreamReply, UpstreamRequest};
