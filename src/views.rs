//! Plain-text list views with explicit loading, error and empty states.

use std::fmt::Display;
use std::future::Future;

use lexdesk_core::models::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Failed(String),
    Empty,
    Ready(Vec<T>),
}

impl<T> ListState<T> {
    pub fn from_result<E: Display>(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Ready(items),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Keep only matching items; a list filtered down to nothing is `Empty`.
    pub fn retain(self, keep: impl FnMut(&T) -> bool) -> Self {
        match self {
            Self::Ready(items) => {
                Self::from_result::<&str>(Ok(items.into_iter().filter(keep).collect()))
            }
            other => other,
        }
    }
}

pub trait ListRow {
    fn row(&self) -> String;
}

impl ListRow for Task {
    fn row(&self) -> String {
        let due = self
            .due_date
            .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        format!(
            "#{} [{}] {} ({}){}",
            self.id,
            self.status.as_str(),
            self.title,
            self.priority.as_str(),
            due
        )
    }
}

impl ListRow for Case {
    fn row(&self) -> String {
        format!(
            "#{} {} {} [{}]",
            self.id,
            self.case_number,
            self.title,
            self.status.as_str()
        )
    }
}

impl ListRow for Client {
    fn row(&self) -> String {
        let company = self
            .company
            .as_deref()
            .map(|c| format!(" / {c}"))
            .unwrap_or_default();
        format!("#{} {}{} [{}]", self.id, self.name, company, self.status.as_str())
    }
}

impl ListRow for Call {
    fn row(&self) -> String {
        let duration = self
            .duration
            .map(|m| format!(" ({m} min)"))
            .unwrap_or_default();
        format!(
            "#{} {} {}{}",
            self.id,
            self.scheduled_at.format("%Y-%m-%d %H:%M"),
            self.company,
            duration
        )
    }
}

impl ListRow for Notification {
    fn row(&self) -> String {
        let marker = if self.read { ' ' } else { '*' };
        format!(
            "#{} {} [{}] {}: {}",
            self.id,
            marker,
            self.kind.as_str(),
            self.title,
            self.description
        )
    }
}

impl ListRow for User {
    fn row(&self) -> String {
        format!("#{} {} <{}>", self.id, self.username, self.email)
    }
}

pub fn render_list<T: ListRow>(title: &str, state: &ListState<T>) -> String {
    let body = match state {
        ListState::Loading => format!("  Loading {}...", title.to_lowercase()),
        ListState::Failed(message) => format!("  Could not load {}: {message}", title.to_lowercase()),
        ListState::Empty => format!("  No {} yet.", title.to_lowercase()),
        ListState::Ready(items) => items
            .iter()
            .map(|item| format!("  {}", item.row()))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    format!("{title}\n{body}")
}

/// Fetch and render one list. The loading frame goes to `on_loading` before
/// the fetch is awaited; the settled frame is returned.
pub async fn load_list<T, E, F>(title: &str, fetch: F, on_loading: impl FnOnce(&str)) -> String
where
    T: ListRow,
    E: Display,
    F: Future<Output = Result<Vec<T>, E>>,
{
    on_loading(&render_list(title, &ListState::<T>::Loading));
    render_list(title, &ListState::from_result(fetch.await))
}

fn render_stats(stats: &Result<Stats, String>) -> String {
    match stats {
        Ok(s) => format!(
            "Overview\n  Active clients  {:>5}  ({:+.1}%)\n  Ongoing cases   {:>5}  ({:+.1}%)\n  AI calls        {:>5}  ({:+.1}%)",
            s.active_clients,
            s.active_clients_change,
            s.ongoing_cases,
            s.ongoing_cases_change,
            s.ai_calls,
            s.ai_calls_change
        ),
        Err(message) => format!("Overview\n  Could not load stats: {message}"),
    }
}

/// Stats, open tasks and unread notifications.
pub fn render_dashboard(
    stats: &Result<Stats, String>,
    tasks: ListState<Task>,
    notifications: ListState<Notification>,
) -> String {
    let open_tasks = tasks.retain(|t| t.status != TaskStatus::Completed);
    let unread = notifications.retain(|n| !n.read);
    [
        render_stats(stats),
        render_list("Open tasks", &open_tasks),
        render_list("Unread notifications", &unread),
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, title: &str, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            due_date: None,
            status,
            priority: TaskPriority::Medium,
            assigned_to: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn every_state_renders() {
        assert_eq!(render_list::<Task>("Tasks", &ListState::Loading), "Tasks\n  Loading tasks...");
        assert_eq!(
            render_list::<Task>("Tasks", &ListState::Failed("offline".into())),
            "Tasks\n  Could not load tasks: offline"
        );
        assert_eq!(render_list::<Task>("Tasks", &ListState::Empty), "Tasks\n  No tasks yet.");
        let ready = ListState::Ready(vec![task(1, "Draft brief", TaskStatus::Pending)]);
        assert_eq!(render_list("Tasks", &ready), "Tasks\n  #1 [pending] Draft brief (medium)");
    }

    #[test]
    fn empty_results_become_empty_state() {
        let state = ListState::<Task>::from_result::<String>(Ok(Vec::new()));
        assert_eq!(state, ListState::Empty);
    }

    #[test]
    fn filtering_everything_out_is_empty() {
        let state = ListState::Ready(vec![task(1, "Done", TaskStatus::Completed)])
            .retain(|t| t.status != TaskStatus::Completed);
        assert_eq!(state, ListState::Empty);
    }

    #[tokio::test]
    async fn load_list_shows_loading_before_the_result() {
        let mut frames = Vec::new();
        let settled = load_list(
            "Tasks",
            async { Ok::<_, String>(vec![task(3, "Serve papers", TaskStatus::Blocked)]) },
            |frame| frames.push(frame.to_string()),
        )
        .await;

        assert_eq!(frames, vec!["Tasks\n  Loading tasks...".to_string()]);
        assert_eq!(settled, "Tasks\n  #3 [blocked] Serve papers (medium)");
    }

    #[tokio::test]
    async fn load_list_settles_on_failure() {
        let mut loading = None;
        let settled = load_list(
            "Calls",
            async { Err::<Vec<Call>, _>("connection refused") },
            |frame| loading = Some(frame.to_string()),
        )
        .await;

        assert_eq!(loading.as_deref(), Some("Calls\n  Loading calls..."));
        assert_eq!(settled, "Calls\n  Could not load calls: connection refused");
    }

    #[test]
    fn dashboard_hides_completed_tasks() {
        let tasks = ListState::Ready(vec![
            task(1, "Open item", TaskStatus::InProgress),
            task(2, "Closed item", TaskStatus::Completed),
        ]);
        let out = render_dashboard(&Err("offline".into()), tasks, ListState::Empty);
        assert!(out.contains("Open item"));
        assert!(!out.contains("Closed item"));
        assert!(out.contains("Could not load stats: offline"));
        assert!(out.contains("No unread notifications yet."));
    }
}
