//! Dashboard state and the interactions that change it.
//!
//! # State Transitions
//! ```text
//! load_initial_data: health probe → (users ‖ tasks ‖ stats) → commit all or nothing
//! select_user(id):   user detail → tasks for (user AND status filter) → commit both
//! filter_tasks(s):   tasks for (selected user AND s)
//! clear_selection:   tasks for (status filter)
//! refresh:           clear selection and filter → load_initial_data
//! ```
//!
//! # Design Decisions
//! - User and status filters compose with AND; neither silently drops the other
//! - A failed step records one error message and leaves earlier data in place

use crate::client::ClientResult;
use crate::dashboard::source::DataSource;
use crate::model::{HealthReport, Stats, Task, TaskFilter, TaskList, User, UserList};

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub stats: Option<Stats>,
    pub health: Option<HealthReport>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_user_id: Option<i64>,
    pub selected_user: Option<User>,
    /// Active status filter; `None` shows every status.
    pub task_filter: Option<String>,
}

impl DashboardState {
    /// Task query implied by the current selection and filter.
    pub fn task_query(&self) -> TaskFilter {
        TaskFilter {
            status: self.task_filter.clone(),
            user_id: self.selected_user_id.map(|id| id.to_string()),
        }
    }
}

/// Stateful view over a [`DataSource`].
pub struct Dashboard<S> {
    source: S,
    state: DashboardState,
}

impl<S: DataSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }

    fn finish<T>(&mut self, result: ClientResult<T>, what: &str) -> Option<T> {
        self.state.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to {}", what);
                let message = e.to_string();
                self.state.error = Some(if message.is_empty() {
                    format!("Failed to {}", what)
                } else {
                    message
                });
                None
            }
        }
    }

    /// Probe health, then load users, tasks and stats together.
    pub async fn load_initial_data(&mut self) {
        self.begin();
        let result = self.fetch_initial().await;
        if let Some((users, tasks, stats)) = self.finish(result, "load data") {
            self.state.users = users.users;
            self.state.tasks = tasks.tasks;
            self.state.stats = Some(stats);
        }
    }

    async fn fetch_initial(&mut self) -> ClientResult<(UserList, TaskList, Stats)> {
        let health = self.source.check_health().await?;
        self.state.health = Some(health);

        let query = self.state.task_query();
        tokio::try_join!(
            self.source.get_users(),
            self.source.get_tasks(&query),
            self.source.get_stats(),
        )
    }

    /// Select a user: fetch its details and narrow the task list to it.
    /// The selection changes only when both fetches succeed.
    pub async fn select_user(&mut self, id: i64) {
        self.begin();
        let result = self.fetch_selection(id).await;
        if let Some((user, tasks)) = self.finish(result, "load user details") {
            self.state.selected_user_id = Some(id);
            self.state.selected_user = Some(user);
            self.state.tasks = tasks.tasks;
        }
    }

    async fn fetch_selection(&self, id: i64) -> ClientResult<(User, TaskList)> {
        let user = self.source.get_user_by_id(id).await?;
        let query = TaskFilter {
            user_id: Some(id.to_string()),
            ..self.state.task_query()
        };
        let tasks = self.source.get_tasks(&query).await?;
        Ok((user, tasks))
    }

    /// Show only tasks with `status`; an empty status shows all.
    pub async fn filter_tasks(&mut self, status: &str) {
        self.state.task_filter = Some(status.to_string()).filter(|s| !s.is_empty());
        self.reload_tasks("filter tasks").await;
    }

    /// Drop the selected user and widen the task list again.
    pub async fn clear_selection(&mut self) {
        self.state.selected_user_id = None;
        self.state.selected_user = None;
        self.reload_tasks("load tasks").await;
    }

    /// Clear selection and filter, then load everything again.
    pub async fn refresh(&mut self) {
        self.state.selected_user_id = None;
        self.state.selected_user = None;
        self.state.task_filter = None;
        self.load_initial_data().await;
    }

    async fn reload_tasks(&mut self, what: &str) {
        self.begin();
        let result = self.source.get_tasks(&self.state.task_query()).await;
        if let Some(tasks) = self.finish(result, what) {
            self.state.tasks = tasks.tasks;
        }
    }
}
