//! Plain-text rendering of the dashboard.

use std::fmt;

use crate::dashboard::view::DashboardState;
use crate::model::{Stats, Task};

/// Short marker shown next to a task status.
pub fn status_badge(status: &str) -> &'static str {
    match status {
        "completed" => "[x]",
        "in-progress" => "[~]",
        "pending" => "[ ]",
        _ => "[?]",
    }
}

fn write_stats(f: &mut fmt::Formatter<'_>, stats: &Stats) -> fmt::Result {
    writeln!(f, "Stats")?;
    writeln!(f, "  users: {}", stats.users.total)?;
    writeln!(
        f,
        "  tasks: {} (pending {}, in progress {}, completed {})",
        stats.tasks.total, stats.tasks.pending, stats.tasks.in_progress, stats.tasks.completed
    )
}

fn write_task(f: &mut fmt::Formatter<'_>, task: &Task) -> fmt::Result {
    writeln!(
        f,
        "  {} #{} {} ({}, user {})",
        status_badge(&task.status),
        task.id,
        task.title,
        task.status,
        task.user_id
    )
}

impl fmt::Display for DashboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.health {
            Some(health) => {
                let label = if health.is_ok() { "OK" } else { "DOWN" };
                writeln!(f, "Health: {} - {}", label, health.message)?;
                if let Some(error) = &health.error {
                    writeln!(f, "  {}", error)?;
                }
            }
            None => writeln!(f, "Health: unknown")?,
        }

        if let Some(error) = &self.error {
            writeln!(f, "Error: {} (run refresh to retry)", error)?;
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        }

        if let Some(stats) = &self.stats {
            writeln!(f)?;
            write_stats(f, stats)?;
        }

        writeln!(f)?;
        writeln!(f, "Users")?;
        if self.users.is_empty() {
            writeln!(f, "  No users found")?;
        }
        for user in &self.users {
            let marker = if self.selected_user_id == Some(user.id) { ">" } else { " " };
            writeln!(f, "{} #{} {} <{}>", marker, user.id, user.name, user.email)?;
        }

        if let Some(user) = &self.selected_user {
            writeln!(f)?;
            writeln!(f, "Selected user")?;
            writeln!(f, "  Name:  {}", user.name)?;
            writeln!(f, "  Email: {}", user.email)?;
            writeln!(f, "  Role:  {}", user.role)?;
        }

        writeln!(f)?;
        match &self.task_filter {
            Some(status) => writeln!(f, "Tasks ({})", status)?,
            None => writeln!(f, "Tasks (all)")?,
        }
        if self.tasks.is_empty() {
            writeln!(f, "  No tasks found")?;
        }
        for task in &self.tasks {
            write_task(f, task)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    #[test]
    fn test_empty_state() {
        let text = DashboardState::default().to_string();
        assert!(text.contains("Health: unknown"));
        assert!(text.contains("No users found"));
        assert!(text.contains("No tasks found"));
        assert!(text.contains("Tasks (all)"));
    }

    #[test]
    fn test_selection_and_tasks() {
        let state = DashboardState {
            users: vec![User {
                id: 2,
                name: "Jane Smith".into(),
                email: "jane@example.com".into(),
                role: "designer".into(),
            }],
            tasks: vec![Task {
                id: 2,
                title: "Design user interface".into(),
                status: "in-progress".into(),
                user_id: 2,
            }],
            selected_user_id: Some(2),
            task_filter: Some("in-progress".into()),
            error: Some("boom".into()),
            ..Default::default()
        };

        let text = state.to_string();
        assert!(text.contains("> #2 Jane Smith <jane@example.com>"));
        assert!(text.contains("[~] #2 Design user interface (in-progress, user 2)"));
        assert!(text.contains("Tasks (in-progress)"));
        assert!(text.contains("Error: boom"));
    }

    #[test]
    fn test_unknown_status_badge() {
        assert_eq!(status_badge("blocked"), "[?]");
    }
}
