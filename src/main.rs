//! Task Proxy
//!
//! A JSON gateway that relays a fixed set of routes to the task service.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 TASK PROXY                    │
//!                          │                                               │
//!     Client Request       │  ┌──────────┐    ┌──────────┐    ┌─────────┐ │
//!     ─────────────────────┼─▶│  layers  │───▶│  router  │───▶│ handler │ │
//!                          │  │ id/trace │    │  routes  │    │         │ │
//!                          │  └──────────┘    └──────────┘    └────┬────┘ │
//!                          │                                       │      │
//!                          │                                       ▼      │
//!     Client Response      │  ┌──────────┐                  ┌──────────┐ │
//!     ◀────────────────────┼──│ ApiError │◀─────────────────│ upstream │◀┼──── Task
//!                          │  │  / relay │                  │  client  │ │     Service
//!                          │  └──────────┘                  └──────────┘ │
//!                          │                                               │
//!                          │  config · observability · lifecycle           │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use task_proxy::config::load_config;
use task_proxy::lifecycle::startup;
use task_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "task-proxy")]
#[command(about = "JSON gateway in front of the task service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logging depends on the configured level, so config errors go to stderr.
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    tracing::info!("task-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await
}
