use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use task_proxy::client::{ApiClient, DEFAULT_API_URL};
use task_proxy::dashboard::Dashboard;
use task_proxy::model::TaskFilter;

#[derive(Parser)]
#[command(name = "task-cli")]
#[command(about = "Command-line client and dashboard for the task proxy", long_about = None)]
struct Cli {
    #[arg(short, long, env = "API_URL", default_value = DEFAULT_API_URL)]
    url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy and upstream health
    Health,
    /// List all users
    Users,
    /// Show one user
    User { id: i64 },
    /// List tasks, optionally filtered
    Tasks {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Show one task
    Task { id: i64 },
    /// Show aggregate counts
    Stats,
    /// Create a user from a JSON document
    CreateUser { json: String },
    /// Create a task from a JSON document
    CreateTask { json: String },
    /// Update a task from a JSON document
    UpdateTask { id: i64, json: String },
    /// Load everything and print the dashboard view
    Dashboard {
        /// Select this user after loading
        #[arg(long)]
        user: Option<i64>,
        /// Show only tasks with this status
        #[arg(long)]
        status: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::with_timeout(&cli.url, Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Health => print_json(&client.check_health().await?)?,
        Commands::Users => print_json(&client.get_users().await?)?,
        Commands::User { id } => print_json(&client.get_user_by_id(id).await?)?,
        Commands::Tasks { status, user_id } => {
            let filter = TaskFilter::new(status.as_deref(), user_id.as_deref());
            print_json(&client.get_tasks(&filter).await?)?
        }
        Commands::Task { id } => print_json(&client.get_task_by_id(id).await?)?,
        Commands::Stats => print_json(&client.get_stats().await?)?,
        Commands::CreateUser { json } => {
            let body: Value = serde_json::from_str(&json)?;
            print_json(&client.create_user(&body).await?)?
        }
        Commands::CreateTask { json } => {
            let body: Value = serde_json::from_str(&json)?;
            print_json(&client.create_task(&body).await?)?
        }
        Commands::UpdateTask { id, json } => {
            let body: Value = serde_json::from_str(&json)?;
            print_json(&client.update_task(id, &body).await?)?
        }
        Commands::Dashboard { user, status } => {
            let mut dashboard = Dashboard::new(client);
            dashboard.load_initial_data().await;
            if let Some(id) = user {
                dashboard.select_user(id).await;
            }
            if let Some(status) = status {
                dashboard.filter_tasks(&status).await;
            }
            print!("{}", dashboard.state());
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
