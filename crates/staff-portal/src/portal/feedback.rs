use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Feedback, FeedbackKind, FeedbackStatus, RecordId};
use super::error::{require_text, ValidationError};

/// Name stored on feedback whose author chose to stay anonymous.
pub const ANONYMOUS_NAME: &str = "匿名用户";

/// Mailbox form as submitted by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub kind: FeedbackKind,
    pub title: String,
    pub content: String,
    /// Falls back to the kind's default when omitted.
    #[serde(default)]
    pub is_anonymous: Option<bool>,
}

impl FeedbackSubmission {
    pub fn anonymous(&self) -> bool {
        self.is_anonymous
            .unwrap_or_else(|| self.kind.anonymous_by_default())
    }

    /// Validate the form and turn it into a pending mailbox entry.
    pub fn into_feedback(
        self,
        id: RecordId,
        author: &str,
        today: NaiveDate,
    ) -> Result<Feedback, ValidationError> {
        let is_anonymous = self.anonymous();
        let title = require_text("title", &self.title)?;
        let content = require_text("content", &self.content)?;

        let name = if is_anonymous {
            ANONYMOUS_NAME.to_string()
        } else {
            author.to_string()
        };

        Ok(Feedback {
            id,
            kind: self.kind,
            date: today,
            title,
            content,
            status: FeedbackStatus::Pending,
            name,
            is_anonymous,
        })
    }
}
