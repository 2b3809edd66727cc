use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rand::seq::IndexedRandom;

use super::{Responder, DEFAULT_SECTION};

/// Replies with a random line from a per-section table after a fixed delay.
/// Sections without a table fall back to the general one.
pub struct CannedResponder {
    delay: Duration,
    replies: HashMap<String, Vec<String>>,
}

impl CannedResponder {
    pub fn new(delay: Duration) -> Self {
        let mut replies = HashMap::new();
        for (section, lines) in DEFAULT_REPLIES {
            replies.insert(
                section.to_string(),
                lines.iter().map(|s| s.to_string()).collect(),
            );
        }
        Self { delay, replies }
    }

    /// Replace the table for one section.
    pub fn with_replies(mut self, section: &str, lines: Vec<String>) -> Self {
        self.replies.insert(section.to_string(), lines);
        self
    }
}

#[async_trait]
impl Responder for CannedResponder {
    async fn respond(&self, section: &str, _message: &str) -> anyhow::Result<String> {
        tokio::time::sleep(self.delay).await;
        let lines = self
            .replies
            .get(section)
            .or_else(|| self.replies.get(DEFAULT_SECTION))
            .with_context(|| format!("no replies for section '{section}'"))?;
        lines
            .choose(&mut rand::rng())
            .cloned()
            .with_context(|| format!("reply table for '{section}' is empty"))
    }
}

const DEFAULT_REPLIES: &[(&str, &[&str])] = &[
    (
        DEFAULT_SECTION,
        &[
            "I can help with that. Could you share a few more details?",
            "Let me look into that for you.",
            "Noted. Is there anything else you need today?",
        ],
    ),
    (
        "tasks",
        &[
            "You have a few tasks due this week. Want me to list the high priority ones?",
            "I can create a task for that. What due date should I use?",
        ],
    ),
    (
        "cases",
        &[
            "I can pull the latest filings for that case.",
            "Would you like a summary of the case status?",
        ],
    ),
    (
        "clients",
        &[
            "I can draft a follow-up email to that client.",
            "Want me to schedule a call with the client?",
        ],
    ),
    (
        "calls",
        &[
            "I can prepare talking points before the call.",
            "Should I summarize the notes from your last call?",
        ],
    ),
];
