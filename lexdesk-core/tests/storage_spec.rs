use speculate2::speculate;

speculate! {
    use chrono::{Duration, Utc};
    use lexdesk_core::models::*;
    use lexdesk_core::{Database, MemStorage, Storage, StorageError};
    use tempfile::TempDir;

    /// A store under test; the temp dir keeps the SQLite file alive.
    struct Backend {
        name: &'static str,
        storage: Box<dyn Storage>,
        _dir: Option<TempDir>,
    }

    fn backends() -> Vec<Backend> {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::open(&dir.path().join("lexdesk.db")).expect("Failed to open database");
        db.migrate().expect("Failed to migrate");
        vec![
            Backend { name: "memory", storage: Box::new(MemStorage::new()), _dir: None },
            Backend { name: "sqlite", storage: Box::new(db), _dir: Some(dir) },
        ]
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password_hash: "pbkdf2-sha256$1$00$00".into(),
            email: format!("{username}@example.test"),
            full_name: None,
            job_title: None,
            avatar: None,
        }
    }

    fn notification(title: &str) -> InsertNotification {
        InsertNotification {
            title: title.into(),
            description: "Filed with the court".into(),
            kind: NotificationType::Document,
            read: None,
            user_id: None,
        }
    }

    describe "tasks" {
        it "assigns increasing ids and returns them in order" {
            for b in backends() {
                let before = Utc::now();
                let first = b.storage.create_task(InsertTask::new("Draft brief")).unwrap();
                let second = b.storage.create_task(InsertTask::new("File motion")).unwrap();

                assert!(second.id > first.id, "{}", b.name);
                assert!(first.created_at >= before, "{}", b.name);
                let ids: Vec<_> = b.storage.list_tasks().unwrap().iter().map(|t| t.id).collect();
                assert_eq!(ids, vec![first.id, second.id], "{}", b.name);
            }
        }

        it "fills defaults for omitted fields" {
            for b in backends() {
                let task = b.storage.create_task(InsertTask::new("Call opposing counsel")).unwrap();
                assert_eq!(task.status, TaskStatus::Pending, "{}", b.name);
                assert_eq!(task.priority, TaskPriority::Medium, "{}", b.name);
                assert_eq!(task.description, None, "{}", b.name);
            }
        }

        it "reads back what was written" {
            for b in backends() {
                let created = b.storage.create_task(InsertTask {
                    description: Some("Before Friday".into()),
                    due_date: Some(Utc::now() + Duration::days(3)),
                    status: Some(TaskStatus::InProgress),
                    priority: Some(TaskPriority::High),
                    assigned_to: Some(7),
                    ..InsertTask::new("Review discovery")
                }).unwrap();
                assert_eq!(b.storage.get_task(created.id).unwrap(), Some(created), "{}", b.name);
            }
        }

        it "reports a missing id as none" {
            for b in backends() {
                assert_eq!(b.storage.get_task(999).unwrap(), None, "{}", b.name);
            }
        }
    }

    describe "cases" {
        it "stores a case against its client" {
            for b in backends() {
                let client = b.storage.create_client(InsertClient::new("John Doe")).unwrap();
                let case = b.storage.create_case(InsertCase {
                    title: "Doe v. Roe".into(),
                    case_number: "C-100".into(),
                    client_id: Some(client.id),
                    status: Some(CaseStatus::Active),
                }).unwrap();

                let cases = b.storage.list_cases().unwrap();
                assert_eq!(cases, vec![case.clone()], "{}", b.name);
                assert_eq!(cases[0].client_id, Some(client.id), "{}", b.name);
            }
        }

        it "accepts a client id that does not exist" {
            for b in backends() {
                let case = b.storage.create_case(InsertCase {
                    title: "Orphan".into(),
                    case_number: "C-404".into(),
                    client_id: Some(404),
                    status: None,
                }).unwrap();
                assert_eq!(case.status, CaseStatus::Active, "{}", b.name);
            }
        }

        it "assigns users once" {
            for b in backends() {
                let user = b.storage.create_user(new_user("alice")).unwrap();
                let case = b.storage.create_case(InsertCase {
                    title: "Doe v. Roe".into(),
                    case_number: "C-100".into(),
                    client_id: None,
                    status: None,
                }).unwrap();

                let first = b.storage.assign_user_to_case(case.id, user.id).unwrap().unwrap();
                let again = b.storage.assign_user_to_case(case.id, user.id).unwrap().unwrap();
                assert_eq!(first, again, "{}", b.name);

                let assignees = b.storage.list_case_assignees(case.id).unwrap().unwrap();
                assert_eq!(assignees, vec![user], "{}", b.name);
            }
        }

        it "refuses assignments to missing records" {
            for b in backends() {
                let user = b.storage.create_user(new_user("alice")).unwrap();
                assert_eq!(b.storage.assign_user_to_case(42, user.id).unwrap(), None, "{}", b.name);
                assert_eq!(b.storage.list_case_assignees(42).unwrap(), None, "{}", b.name);
            }
        }
    }

    describe "calls" {
        it "tracks participants" {
            for b in backends() {
                let user = b.storage.create_user(new_user("ben")).unwrap();
                let call = b.storage.create_call(InsertCall {
                    company: "Acme Corp".into(),
                    scheduled_at: Utc::now() + Duration::hours(2),
                    duration: Some(30),
                    notes: None,
                }).unwrap();

                assert!(b.storage.add_call_participant(call.id, user.id).unwrap().is_some(), "{}", b.name);
                assert!(b.storage.add_call_participant(call.id, 999).unwrap().is_none(), "{}", b.name);
                let participants = b.storage.list_call_participants(call.id).unwrap().unwrap();
                assert_eq!(participants, vec![user], "{}", b.name);
                assert_eq!(b.storage.get_call(call.id).unwrap(), Some(call), "{}", b.name);
            }
        }
    }

    describe "notifications" {
        it "start unread" {
            for b in backends() {
                let n = b.storage.create_notification(notification("Brief filed")).unwrap();
                assert!(!n.read, "{}", b.name);
            }
        }

        it "mark read idempotently" {
            for b in backends() {
                let n = b.storage.create_notification(notification("Brief filed")).unwrap();
                let once = b.storage.mark_notification_read(n.id).unwrap().unwrap();
                let twice = b.storage.mark_notification_read(n.id).unwrap().unwrap();
                assert!(once.read, "{}", b.name);
                assert_eq!(once, twice, "{}", b.name);
            }
        }

        it "leave others untouched when the id is missing" {
            for b in backends() {
                let n = b.storage.create_notification(notification("Brief filed")).unwrap();
                assert_eq!(b.storage.mark_notification_read(n.id + 1).unwrap(), None, "{}", b.name);
                assert_eq!(b.storage.list_notifications().unwrap(), vec![n], "{}", b.name);
            }
        }
    }

    describe "users" {
        it "rejects a duplicate username" {
            for b in backends() {
                b.storage.create_user(new_user("alice")).unwrap();
                let err = b.storage.create_user(new_user("alice")).unwrap_err();
                assert!(matches!(err, StorageError::Duplicate(_)), "{}: {err}", b.name);
                assert_eq!(b.storage.list_users().unwrap().len(), 1, "{}", b.name);
            }
        }

        it "returns the stored hash only through the credential lookup" {
            for b in backends() {
                let user = b.storage.create_user(new_user("alice")).unwrap();
                let (found, hash) = b.storage.get_user_credential("alice").unwrap().unwrap();
                assert_eq!(found, user, "{}", b.name);
                assert_eq!(hash, "pbkdf2-sha256$1$00$00", "{}", b.name);
                assert_eq!(b.storage.get_user_by_username("nobody").unwrap(), None, "{}", b.name);
            }
        }
    }

    describe "stats" {
        it "replace the singleton row" {
            for b in backends() {
                assert_eq!(b.storage.get_stats().unwrap().active_clients, 0, "{}", b.name);

                let put = b.storage.put_stats(InsertStats {
                    active_clients: 12,
                    ongoing_cases: 5,
                    ai_calls: 40,
                    active_clients_change: 8.5,
                    ongoing_cases_change: -2.0,
                    ai_calls_change: 12.25,
                }).unwrap();

                assert_eq!(put.id, Stats::ROW_ID, "{}", b.name);
                assert_eq!(b.storage.get_stats().unwrap(), put, "{}", b.name);
            }
        }
    }

    describe "sqlite persistence" {
        it "survives reopening the file" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("lexdesk.db");
            let task = {
                let db = Database::open(&path).unwrap();
                db.migrate().unwrap();
                db.create_task(InsertTask::new("Persist me")).unwrap()
            };

            let db = Database::open(&path).unwrap();
            db.migrate().unwrap();
            assert_eq!(db.get_task(task.id).unwrap(), Some(task));
            let next = db.create_task(InsertTask::new("After reopen")).unwrap();
            assert!(next.id > 1);
        }
    }
}
