use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::Database;
use crate::error::StorageError;
use crate::models::*;
use crate::storage::{Result, Storage};

const USER_COLUMNS: &str = "id, username, email, full_name, job_title, avatar, created_at";
const TASK_COLUMNS: &str =
    "id, title, description, due_date, status, priority, assigned_to, created_at";
const CLIENT_COLUMNS: &str = "id, name, company, email, phone, status, created_at";
const CASE_COLUMNS: &str = "id, title, case_number, client_id, status, created_at";
const CALL_COLUMNS: &str = "id, company, scheduled_at, duration, notes, created_at";
const NOTIFICATION_COLUMNS: &str = "id, title, description, type, read, user_id, created_at";
const STATS_COLUMNS: &str = "id, active_clients, ongoing_cases, ai_calls, \
     active_clients_change, ongoing_cases_change, ai_calls_change, updated_at";

fn parse_enum<T>(row: &Row, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected value '{raw}'").into(),
        )
    })
}

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        job_title: row.get(4)?,
        avatar: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: row.get(3)?,
        status: parse_enum(row, 4, TaskStatus::from_str)?,
        priority: parse_enum(row, 5, TaskPriority::from_str)?,
        assigned_to: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_client(row: &Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        company: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        status: parse_enum(row, 5, ClientStatus::from_str)?,
        created_at: row.get(6)?,
    })
}

fn map_case(row: &Row) -> rusqlite::Result<Case> {
    Ok(Case {
        id: row.get(0)?,
        title: row.get(1)?,
        case_number: row.get(2)?,
        client_id: row.get(3)?,
        status: parse_enum(row, 4, CaseStatus::from_str)?,
        created_at: row.get(5)?,
    })
}

fn map_case_assignment(row: &Row) -> rusqlite::Result<CaseAssignment> {
    Ok(CaseAssignment {
        id: row.get(0)?,
        case_id: row.get(1)?,
        user_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_call(row: &Row) -> rusqlite::Result<Call> {
    Ok(Call {
        id: row.get(0)?,
        company: row.get(1)?,
        scheduled_at: row.get(2)?,
        duration: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_call_participant(row: &Row) -> rusqlite::Result<CallParticipant> {
    Ok(CallParticipant {
        id: row.get(0)?,
        call_id: row.get(1)?,
        user_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_notification(row: &Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        kind: parse_enum(row, 3, NotificationType::from_str)?,
        read: row.get(4)?,
        user_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_stats(row: &Row) -> rusqlite::Result<Stats> {
    Ok(Stats {
        id: row.get(0)?,
        active_clients: row.get(1)?,
        ongoing_cases: row.get(2)?,
        ai_calls: row.get(3)?,
        active_clients_change: row.get(4)?,
        ongoing_cases_change: row.get(5)?,
        ai_calls_change: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn list<T>(
    conn: &Connection,
    sql: &str,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn get<T>(
    conn: &Connection,
    sql: &str,
    id: i64,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
    Ok(conn.query_row(sql, [id], map).optional()?)
}

fn exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    Ok(conn.query_row(&sql, [id], |row| row.get(0))?)
}

/// Users reachable through a join table, in join-row order.
fn joined_users(conn: &Connection, join_table: &str, key: &str, id: i64) -> Result<Vec<User>> {
    let sql = format!(
        "SELECT u.id, u.username, u.email, u.full_name, u.job_title, u.avatar, u.created_at \
         FROM {join_table} j JOIN users u ON u.id = j.user_id \
         WHERE j.{key} = ?1 ORDER BY j.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([id], map_user)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl Storage for Database {
    fn list_users(&self) -> Result<Vec<User>> {
        self.with_connection(|conn| {
            list(conn, &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"), map_user)
        })
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.with_connection(|conn| {
            get(conn, &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"), id, map_user)
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                    [username],
                    map_user,
                )
                .optional()?)
        })
    }

    fn get_user_credential(&self, username: &str) -> Result<Option<(User, String)>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1"),
                    [username],
                    |row| Ok((map_user(row)?, row.get(7)?)),
                )
                .optional()?)
        })
    }

    fn create_user(&self, input: NewUser) -> Result<User> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO users (username, password_hash, email, full_name, job_title, avatar, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {USER_COLUMNS}"
                ),
                params![
                    input.username,
                    input.password_hash,
                    input.email,
                    input.full_name,
                    input.job_title,
                    input.avatar,
                    Utc::now(),
                ],
                map_user,
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::Duplicate("username".into())
                } else {
                    e.into()
                }
            })
        })
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_connection(|conn| {
            list(conn, &format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"), map_task)
        })
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_connection(|conn| {
            get(conn, &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"), id, map_task)
        })
    }

    fn create_task(&self, input: InsertTask) -> Result<Task> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO tasks (title, description, due_date, status, priority, assigned_to, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {TASK_COLUMNS}"
                ),
                params![
                    input.title,
                    input.description,
                    input.due_date,
                    input.status.unwrap_or_default().as_str(),
                    input.priority.unwrap_or_default().as_str(),
                    input.assigned_to,
                    Utc::now(),
                ],
                map_task,
            )?)
        })
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        self.with_connection(|conn| {
            list(conn, &format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id"), map_client)
        })
    }

    fn get_client(&self, id: i64) -> Result<Option<Client>> {
        self.with_connection(|conn| {
            get(conn, &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"), id, map_client)
        })
    }

    fn create_client(&self, input: InsertClient) -> Result<Client> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO clients (name, company, email, phone, status, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {CLIENT_COLUMNS}"
                ),
                params![
                    input.name,
                    input.company,
                    input.email,
                    input.phone,
                    input.status.unwrap_or_default().as_str(),
                    Utc::now(),
                ],
                map_client,
            )?)
        })
    }

    fn list_cases(&self) -> Result<Vec<Case>> {
        self.with_connection(|conn| {
            list(conn, &format!("SELECT {CASE_COLUMNS} FROM cases ORDER BY id"), map_case)
        })
    }

    fn get_case(&self, id: i64) -> Result<Option<Case>> {
        self.with_connection(|conn| {
            get(conn, &format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?1"), id, map_case)
        })
    }

    fn create_case(&self, input: InsertCase) -> Result<Case> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO cases (title, case_number, client_id, status, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {CASE_COLUMNS}"
                ),
                params![
                    input.title,
                    input.case_number,
                    input.client_id,
                    input.status.unwrap_or_default().as_str(),
                    Utc::now(),
                ],
                map_case,
            )?)
        })
    }

    fn assign_user_to_case(&self, case_id: i64, user_id: i64) -> Result<Option<CaseAssignment>> {
        self.with_connection(|conn| {
            if !exists(conn, "cases", case_id)? || !exists(conn, "users", user_id)? {
                return Ok(None);
            }
            conn.execute(
                "INSERT OR IGNORE INTO case_assignments (case_id, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![case_id, user_id, Utc::now()],
            )?;
            Ok(Some(conn.query_row(
                "SELECT id, case_id, user_id, created_at FROM case_assignments \
                 WHERE case_id = ?1 AND user_id = ?2",
                [case_id, user_id],
                map_case_assignment,
            )?))
        })
    }

    fn list_case_assignees(&self, case_id: i64) -> Result<Option<Vec<User>>> {
        self.with_connection(|conn| {
            if !exists(conn, "cases", case_id)? {
                return Ok(None);
            }
            joined_users(conn, "case_assignments", "case_id", case_id).map(Some)
        })
    }

    fn list_calls(&self) -> Result<Vec<Call>> {
        self.with_connection(|conn| {
            list(conn, &format!("SELECT {CALL_COLUMNS} FROM calls ORDER BY id"), map_call)
        })
    }

    fn get_call(&self, id: i64) -> Result<Option<Call>> {
        self.with_connection(|conn| {
            get(conn, &format!("SELECT {CALL_COLUMNS} FROM calls WHERE id = ?1"), id, map_call)
        })
    }

    fn create_call(&self, input: InsertCall) -> Result<Call> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO calls (company, scheduled_at, duration, notes, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {CALL_COLUMNS}"
                ),
                params![
                    input.company,
                    input.scheduled_at,
                    input.duration,
                    input.notes,
                    Utc::now(),
                ],
                map_call,
            )?)
        })
    }

    fn add_call_participant(&self, call_id: i64, user_id: i64) -> Result<Option<CallParticipant>> {
        self.with_connection(|conn| {
            if !exists(conn, "calls", call_id)? || !exists(conn, "users", user_id)? {
                return Ok(None);
            }
            conn.execute(
                "INSERT OR IGNORE INTO call_participants (call_id, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![call_id, user_id, Utc::now()],
            )?;
            Ok(Some(conn.query_row(
                "SELECT id, call_id, user_id, created_at FROM call_participants \
                 WHERE call_id = ?1 AND user_id = ?2",
                [call_id, user_id],
                map_call_participant,
            )?))
        })
    }

    fn list_call_participants(&self, call_id: i64) -> Result<Option<Vec<User>>> {
        self.with_connection(|conn| {
            if !exists(conn, "calls", call_id)? {
                return Ok(None);
            }
            joined_users(conn, "call_participants", "call_id", call_id).map(Some)
        })
    }

    fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.with_connection(|conn| {
            list(
                conn,
                &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY id"),
                map_notification,
            )
        })
    }

    fn get_notification(&self, id: i64) -> Result<Option<Notification>> {
        self.with_connection(|conn| {
            get(
                conn,
                &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1"),
                id,
                map_notification,
            )
        })
    }

    fn create_notification(&self, input: InsertNotification) -> Result<Notification> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO notifications (title, description, type, read, user_id, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {NOTIFICATION_COLUMNS}"
                ),
                params![
                    input.title,
                    input.description,
                    input.kind.as_str(),
                    input.read.unwrap_or(false),
                    input.user_id,
                    Utc::now(),
                ],
                map_notification,
            )?)
        })
    }

    fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!(
                        "UPDATE notifications SET read = 1 WHERE id = ?1 RETURNING {NOTIFICATION_COLUMNS}"
                    ),
                    [id],
                    map_notification,
                )
                .optional()?)
        })
    }

    fn get_stats(&self) -> Result<Stats> {
        self.with_connection(|conn| {
            let stats = get(
                conn,
                &format!("SELECT {STATS_COLUMNS} FROM stats WHERE id = ?1"),
                Stats::ROW_ID,
                map_stats,
            )?;
            Ok(stats.unwrap_or_else(|| Stats::empty(Utc::now())))
        })
    }

    fn put_stats(&self, input: InsertStats) -> Result<Stats> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT OR REPLACE INTO stats ({STATS_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {STATS_COLUMNS}"
                ),
                params![
                    Stats::ROW_ID,
                    input.active_clients,
                    input.ongoing_cases,
                    input.ai_calls,
                    input.active_clients_change,
                    input.ongoing_cases_change,
                    input.ai_calls_change,
                    Utc::now(),
                ],
                map_stats,
            )?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate");
        db
    }

    #[test]
    fn migrate_is_idempotent() {
        let db = setup_db();
        db.migrate().unwrap();
        assert_eq!(db.get_stats().unwrap().id, Stats::ROW_ID);
    }

    #[test]
    fn created_task_round_trips() {
        let db = setup_db();
        let mut input = InsertTask::new("Prepare deposition");
        input.status = Some(TaskStatus::InProgress);
        input.due_date = Some(Utc::now());
        let task = db.create_task(input).unwrap();
        assert_eq!(db.get_task(task.id).unwrap(), Some(task));
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let db = setup_db();
        let user = NewUser {
            username: "alice".into(),
            password_hash: "x".into(),
            email: "alice@example.com".into(),
            full_name: None,
            job_title: None,
            avatar: None,
        };
        db.create_user(user.clone()).unwrap();
        assert!(matches!(db.create_user(user), Err(StorageError::Duplicate(_))));
    }

    #[test]
    fn reads_rows_written_with_sql_defaults() {
        let db = setup_db();
        db.with_connection(|conn| {
            conn.execute_batch(
                "INSERT INTO clients (name, status, created_at) VALUES ('x', 'active', '2024-01-01 00:00:00+00:00');",
            )?;
            Ok(())
        })
        .unwrap();
        assert_eq!(db.list_clients().unwrap().len(), 1);
    }
}
