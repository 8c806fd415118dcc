//! Data source seam between the dashboard and the data layer.

use std::future::Future;

use crate::client::{ApiClient, ClientResult};
use crate::model::{HealthReport, Stats, TaskFilter, TaskList, User, UserList};

/// Everything the dashboard reads. Implemented by [`ApiClient`]; tests supply fakes.
pub trait DataSource: Send + Sync {
    fn check_health(&self) -> impl Future<Output = ClientResult<HealthReport>> + Send;

    fn get_users(&self) -> impl Future<Output = ClientResult<UserList>> + Send;

    fn get_user_by_id(&self, id: i64) -> impl Future<Output = ClientResult<User>> + Send;

    fn get_tasks(&self, filter: &TaskFilter) -> impl Future<Output = ClientResult<TaskList>> + Send;

    fn get_stats(&self) -> impl Future<Output = ClientResult<Stats>> + Send;
}

impl DataSource for ApiClient {
    fn check_health(&self) -> impl Future<Output = ClientResult<HealthReport>> + Send {
        ApiClient::check_health(self)
    }

    fn get_users(&self) -> impl Future<Output = ClientResult<UserList>> + Send {
        ApiClient::get_users(self)
    }

    fn get_user_by_id(&self, id: i64) -> impl Future<Output = ClientResult<User>> + Send {
        ApiClient::get_user_by_id(self, id)
    }

    fn get_tasks(&self, filter: &TaskFilter) -> impl Future<Output = ClientResult<TaskList>> + Send {
        ApiClient::get_tasks(self, filter)
    }

    fn get_stats(&self) -> impl Future<Output = ClientResult<Stats>> + Send {
        ApiClient::get_stats(self)
    }
}
