use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::{Result, Storage};
use crate::error::StorageError;
use crate::models::*;

/// Process-local storage collaborator. Contents vanish with the process.
pub struct MemStorage {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Ids {
    users: i64,
    tasks: i64,
    clients: i64,
    cases: i64,
    case_assignments: i64,
    calls: i64,
    call_participants: i64,
    notifications: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

struct Tables {
    ids: Ids,
    users: BTreeMap<i64, (User, String)>,
    tasks: BTreeMap<i64, Task>,
    clients: BTreeMap<i64, Client>,
    cases: BTreeMap<i64, Case>,
    case_assignments: Vec<CaseAssignment>,
    calls: BTreeMap<i64, Call>,
    call_participants: Vec<CallParticipant>,
    notifications: BTreeMap<i64, Notification>,
    stats: Stats,
}

impl Tables {
    fn users_by_id(&self, ids: impl Iterator<Item = i64>) -> Vec<User> {
        ids.filter_map(|id| self.users.get(&id).map(|(user, _)| user.clone()))
            .collect()
    }
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                ids: Ids::default(),
                users: BTreeMap::new(),
                tasks: BTreeMap::new(),
                clients: BTreeMap::new(),
                cases: BTreeMap::new(),
                case_assignments: Vec::new(),
                calls: BTreeMap::new(),
                call_participants: Vec::new(),
                notifications: BTreeMap::new(),
                stats: Stats::empty(Utc::now()),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::Poisoned)
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.read()?.users.values().map(|(u, _)| u.clone()).collect())
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).map(|(u, _)| u.clone()))
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.get_user_credential(username)?.map(|(user, _)| user))
    }

    fn get_user_credential(&self, username: &str) -> Result<Option<(User, String)>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|(u, _)| u.username == username)
            .cloned())
    }

    fn create_user(&self, input: NewUser) -> Result<User> {
        let mut tables = self.write()?;
        if tables.users.values().any(|(u, _)| u.username == input.username) {
            return Err(StorageError::Duplicate("username".into()));
        }
        let user = User {
            id: next(&mut tables.ids.users),
            username: input.username,
            email: input.email,
            full_name: input.full_name,
            job_title: input.job_title,
            avatar: input.avatar,
            created_at: Utc::now(),
        };
        tables
            .users
            .insert(user.id, (user.clone(), input.password_hash));
        Ok(user)
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read()?.tasks.values().cloned().collect())
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    fn create_task(&self, input: InsertTask) -> Result<Task> {
        let mut tables = self.write()?;
        let task = Task {
            id: next(&mut tables.ids.tasks),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            assigned_to: input.assigned_to,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.read()?.clients.values().cloned().collect())
    }

    fn get_client(&self, id: i64) -> Result<Option<Client>> {
        Ok(self.read()?.clients.get(&id).cloned())
    }

    fn create_client(&self, input: InsertClient) -> Result<Client> {
        let mut tables = self.write()?;
        let client = Client {
            id: next(&mut tables.ids.clients),
            name: input.name,
            company: input.company,
            email: input.email,
            phone: input.phone,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        tables.clients.insert(client.id, client.clone());
        Ok(client)
    }

    fn list_cases(&self) -> Result<Vec<Case>> {
        Ok(self.read()?.cases.values().cloned().collect())
    }

    fn get_case(&self, id: i64) -> Result<Option<Case>> {
        Ok(self.read()?.cases.get(&id).cloned())
    }

    fn create_case(&self, input: InsertCase) -> Result<Case> {
        let mut tables = self.write()?;
        let case = Case {
            id: next(&mut tables.ids.cases),
            title: input.title,
            case_number: input.case_number,
            client_id: input.client_id,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        tables.cases.insert(case.id, case.clone());
        Ok(case)
    }

    fn assign_user_to_case(&self, case_id: i64, user_id: i64) -> Result<Option<CaseAssignment>> {
        let mut tables = self.write()?;
        if !tables.cases.contains_key(&case_id) || !tables.users.contains_key(&user_id) {
            return Ok(None);
        }
        if let Some(existing) = tables
            .case_assignments
            .iter()
            .find(|a| a.case_id == case_id && a.user_id == user_id)
        {
            return Ok(Some(existing.clone()));
        }
        let assignment = CaseAssignment {
            id: next(&mut tables.ids.case_assignments),
            case_id,
            user_id,
            created_at: Utc::now(),
        };
        tables.case_assignments.push(assignment.clone());
        Ok(Some(assignment))
    }

    fn list_case_assignees(&self, case_id: i64) -> Result<Option<Vec<User>>> {
        let tables = self.read()?;
        if !tables.cases.contains_key(&case_id) {
            return Ok(None);
        }
        let ids = tables
            .case_assignments
            .iter()
            .filter(|a| a.case_id == case_id)
            .map(|a| a.user_id);
        Ok(Some(tables.users_by_id(ids)))
    }

    fn list_calls(&self) -> Result<Vec<Call>> {
        Ok(self.read()?.calls.values().cloned().collect())
    }

    fn get_call(&self, id: i64) -> Result<Option<Call>> {
        Ok(self.read()?.calls.get(&id).cloned())
    }

    fn create_call(&self, input: InsertCall) -> Result<Call> {
        let mut tables = self.write()?;
        let call = Call {
            id: next(&mut tables.ids.calls),
            company: input.company,
            scheduled_at: input.scheduled_at,
            duration: input.duration,
            notes: input.notes,
            created_at: Utc::now(),
        };
        tables.calls.insert(call.id, call.clone());
        Ok(call)
    }

    fn add_call_participant(&self, call_id: i64, user_id: i64) -> Result<Option<CallParticipant>> {
        let mut tables = self.write()?;
        if !tables.calls.contains_key(&call_id) || !tables.users.contains_key(&user_id) {
            return Ok(None);
        }
        if let Some(existing) = tables
            .call_participants
            .iter()
            .find(|p| p.call_id == call_id && p.user_id == user_id)
        {
            return Ok(Some(existing.clone()));
        }
        let participant = CallParticipant {
            id: next(&mut tables.ids.call_participants),
            call_id,
            user_id,
            created_at: Utc::now(),
        };
        tables.call_participants.push(participant.clone());
        Ok(Some(participant))
    }

    fn list_call_participants(&self, call_id: i64) -> Result<Option<Vec<User>>> {
        let tables = self.read()?;
        if !tables.calls.contains_key(&call_id) {
            return Ok(None);
        }
        let ids = tables
            .call_participants
            .iter()
            .filter(|p| p.call_id == call_id)
            .map(|p| p.user_id);
        Ok(Some(tables.users_by_id(ids)))
    }

    fn list_notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.read()?.notifications.values().cloned().collect())
    }

    fn get_notification(&self, id: i64) -> Result<Option<Notification>> {
        Ok(self.read()?.notifications.get(&id).cloned())
    }

    fn create_notification(&self, input: InsertNotification) -> Result<Notification> {
        let mut tables = self.write()?;
        let notification = Notification {
            id: next(&mut tables.ids.notifications),
            title: input.title,
            description: input.description,
            kind: input.kind,
            read: input.read.unwrap_or(false),
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>> {
        let mut tables = self.write()?;
        Ok(tables.notifications.get_mut(&id).map(|n| {
            n.read = true;
            n.clone()
        }))
    }

    fn get_stats(&self) -> Result<Stats> {
        Ok(self.read()?.stats.clone())
    }

    fn put_stats(&self, input: InsertStats) -> Result<Stats> {
        let mut tables = self.write()?;
        tables.stats = Stats::from_input(input, Utc::now());
        Ok(tables.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_up_per_entity() {
        let storage = MemStorage::new();
        let task = storage.create_task(InsertTask::new("Review lease")).unwrap();
        let client = storage.create_client(InsertClient::new("John Doe")).unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(client.id, 1);
        let second = storage.create_task(InsertTask::new("Call court")).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn stats_start_zeroed() {
        let storage = MemStorage::new();
        let stats = storage.get_stats().unwrap();
        assert_eq!(stats.id, Stats::ROW_ID);
        assert_eq!(stats.active_clients, 0);
    }
}
