//! Demo data for a fresh store.

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::crypto;
use crate::models::*;
use crate::storage::Storage;

pub const DEMO_USERNAME: &str = "alice";
pub const DEMO_PASSWORD: &str = "secret";

/// Populate an empty store. Returns `false` without touching anything if the
/// store already has users.
pub fn demo(storage: &dyn Storage, hash_iterations: u32) -> Result<bool> {
    if !storage.list_users()?.is_empty() {
        tracing::info!("Store already has users; skipping demo seed");
        return Ok(false);
    }

    let alice = storage.create_user(NewUser {
        username: DEMO_USERNAME.into(),
        password_hash: crypto::hash_password(DEMO_PASSWORD, hash_iterations)?,
        email: "alice@lexdesk.test".into(),
        full_name: Some("Alice Morgan".into()),
        job_title: Some("Managing Partner".into()),
        avatar: None,
    })?;
    let ben = storage.create_user(NewUser {
        username: "ben".into(),
        password_hash: crypto::hash_password("paralegal", hash_iterations)?,
        email: "ben@lexdesk.test".into(),
        full_name: Some("Ben Ortiz".into()),
        job_title: Some("Paralegal".into()),
        avatar: None,
    })?;

    let doe = storage.create_client(InsertClient {
        company: Some("Doe Holdings".into()),
        email: Some("john@doeholdings.test".into()),
        phone: Some("555-0100".into()),
        ..InsertClient::new("John Doe")
    })?;
    let acme = storage.create_client(InsertClient {
        company: Some("Acme Corp".into()),
        ..InsertClient::new("Jane Smith")
    })?;
    storage.create_client(InsertClient {
        status: Some(ClientStatus::Inactive),
        ..InsertClient::new("Robert Brown")
    })?;

    let doe_case = storage.create_case(InsertCase {
        title: "Doe v. Roe".into(),
        case_number: "C-100".into(),
        client_id: Some(doe.id),
        status: Some(CaseStatus::Active),
    })?;
    let acme_case = storage.create_case(InsertCase {
        title: "Acme Corp merger review".into(),
        case_number: "C-101".into(),
        client_id: Some(acme.id),
        status: Some(CaseStatus::Pending),
    })?;
    storage.assign_user_to_case(doe_case.id, alice.id)?;
    storage.assign_user_to_case(doe_case.id, ben.id)?;
    storage.assign_user_to_case(acme_case.id, alice.id)?;

    let call = storage.create_call(InsertCall {
        company: "Acme Corp".into(),
        scheduled_at: Utc::now() + Duration::hours(3),
        duration: Some(30),
        notes: Some("Discuss merger timeline".into()),
    })?;
    storage.add_call_participant(call.id, alice.id)?;

    storage.create_task(InsertTask {
        description: Some("Collect signed affidavits".into()),
        due_date: Some(Utc::now() + Duration::days(2)),
        priority: Some(TaskPriority::High),
        assigned_to: Some(alice.id),
        ..InsertTask::new("Prepare discovery packet")
    })?;
    storage.create_task(InsertTask {
        status: Some(TaskStatus::InProgress),
        assigned_to: Some(ben.id),
        ..InsertTask::new("Draft engagement letter")
    })?;
    storage.create_task(InsertTask {
        status: Some(TaskStatus::Completed),
        priority: Some(TaskPriority::Low),
        ..InsertTask::new("File change of address")
    })?;

    storage.create_notification(InsertNotification {
        title: "New document uploaded".into(),
        description: "John Doe shared a signed retainer".into(),
        kind: NotificationType::Document,
        read: None,
        user_id: Some(alice.id),
    })?;
    storage.create_notification(InsertNotification {
        title: "Call scheduled".into(),
        description: "Acme Corp call in three hours".into(),
        kind: NotificationType::Meeting,
        read: None,
        user_id: Some(alice.id),
    })?;

    storage.put_stats(InsertStats {
        active_clients: 2,
        ongoing_cases: 2,
        ai_calls: 1,
        active_clients_change: 12.5,
        ongoing_cases_change: 4.0,
        ai_calls_change: -3.2,
    })?;

    tracing::info!("Seeded demo data");
    Ok(true)
}
