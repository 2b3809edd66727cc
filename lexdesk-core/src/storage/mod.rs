//! The storage contract: the single seam between transport and persistence.
//!
//! Every collaborator assigns identifiers and creation timestamps itself,
//! returns collections in ascending id order, and reports a missing record as
//! `Ok(None)`.

mod memory;

pub use memory::MemStorage;

use crate::error::StorageError;
use crate::models::*;

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait Storage: Send + Sync {
    // Users
    fn list_users(&self) -> Result<Vec<User>>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// The user together with their encoded password hash.
    fn get_user_credential(&self, username: &str) -> Result<Option<(User, String)>>;
    /// Fails with [`StorageError::Duplicate`] if the username is taken.
    fn create_user(&self, input: NewUser) -> Result<User>;

    // Tasks
    fn list_tasks(&self) -> Result<Vec<Task>>;
    fn get_task(&self, id: i64) -> Result<Option<Task>>;
    fn create_task(&self, input: InsertTask) -> Result<Task>;

    // Clients
    fn list_clients(&self) -> Result<Vec<Client>>;
    fn get_client(&self, id: i64) -> Result<Option<Client>>;
    fn create_client(&self, input: InsertClient) -> Result<Client>;

    // Cases
    fn list_cases(&self) -> Result<Vec<Case>>;
    fn get_case(&self, id: i64) -> Result<Option<Case>>;
    fn create_case(&self, input: InsertCase) -> Result<Case>;
    /// `None` when either the case or the user does not exist. Assigning the
    /// same user twice returns the existing assignment.
    fn assign_user_to_case(&self, case_id: i64, user_id: i64) -> Result<Option<CaseAssignment>>;
    /// `None` when the case does not exist.
    fn list_case_assignees(&self, case_id: i64) -> Result<Option<Vec<User>>>;

    // Calls
    fn list_calls(&self) -> Result<Vec<Call>>;
    fn get_call(&self, id: i64) -> Result<Option<Call>>;
    fn create_call(&self, input: InsertCall) -> Result<Call>;
    /// Same contract as [`Storage::assign_user_to_case`].
    fn add_call_participant(&self, call_id: i64, user_id: i64) -> Result<Option<CallParticipant>>;
    fn list_call_participants(&self, call_id: i64) -> Result<Option<Vec<User>>>;

    // Notifications
    fn list_notifications(&self) -> Result<Vec<Notification>>;
    fn get_notification(&self, id: i64) -> Result<Option<Notification>>;
    fn create_notification(&self, input: InsertNotification) -> Result<Notification>;
    /// Idempotent: marking a read notification again returns it unchanged.
    fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>>;

    // Stats
    fn get_stats(&self) -> Result<Stats>;
    fn put_stats(&self, input: InsertStats) -> Result<Stats>;
}
