//! Dashboard: the interactive view over the proxy's data.
//!
//! # Data Flow
//! ```text
//! task-cli dashboard
//!     → view.rs (Dashboard: load / select / filter / refresh)
//!     → source.rs (DataSource, implemented by client::ApiClient)
//!     → render.rs (DashboardState as text)
//! ```

pub mod render;
pub mod source;
pub mod view;

pub use source::DataSource;
pub use view::{Dashboard, DashboardState};
