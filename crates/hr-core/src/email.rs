//! HR email drafts and the mail-delivery seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::answer::Answer;
use crate::employee::Employee;

pub const DEFAULT_HR_EMAIL: &str = "hr@company.com";

const SIGNATURE: &str = "Best regards,\nHR Assistant Bot";

/// What prompted a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    /// Explicit policy / exception request.
    Request,
    /// Question the assistant could not answer.
    Unknown,
    /// Relocation or remote-work question needing approval.
    Approval,
    /// Call / meeting with HR.
    Meeting,
}

/// An email addressed to HR, not yet sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDraft {
    pub kind: DraftKind,
    pub to: String,
    pub employee_name: String,
    pub employee_id: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Escalation email carrying the employee's request verbatim.
    pub fn escalation(
        kind: DraftKind,
        to: &str,
        employee: &Employee,
        subject: impl Into<String>,
        details: &str,
    ) -> Self {
        let (name, id) = identity(employee);
        let subject = subject.into();
        let body = format!(
            "Dear HR Team,\n\nEmployee: {name} (ID: {id})\nSubject: {subject}\n\nREQUEST DETAILS:\n{details}\n\nThis request has been escalated for your review and assistance.\n\n{SIGNATURE}"
        );
        Self {
            kind,
            to: to.to_string(),
            employee_name: name,
            employee_id: id,
            subject,
            body,
        }
    }

    /// Meeting request asking HR to send a calendar invitation.
    pub fn meeting(to: &str, employee: &Employee, reason: &str) -> Self {
        let (name, id) = identity(employee);
        let body = format!(
            "Dear HR Team,\n\nMEETING REQUEST\nEmployee: {name} (ID: {id})\n\nREASON FOR MEETING:\n{reason}\n\nPlease send a calendar invitation to schedule a meeting time with this employee.\n\n{SIGNATURE}"
        );
        Self {
            kind: DraftKind::Meeting,
            to: to.to_string(),
            subject: format!("Meeting Request: {name}"),
            employee_name: name,
            employee_id: id,
            body,
        }
    }

    /// Draft for an answer that escalates to HR; `None` for every other answer.
    pub fn for_answer(answer: &Answer, to: &str, employee: &Employee, question: &str) -> Option<Self> {
        let name = employee.display_name();
        let draft = match answer {
            Answer::EmailHrRequest { question } => Self::escalation(
                DraftKind::Request,
                to,
                employee,
                format!("HR Request from {name}"),
                question,
            ),
            Answer::EmailHrUnknown { question } => Self::escalation(
                DraftKind::Unknown,
                to,
                employee,
                format!("Question from {name}"),
                question,
            ),
            Answer::HybridRequest { question } => Self::escalation(
                DraftKind::Approval,
                to,
                employee,
                format!("Relocation / Remote Work Request from {name}"),
                question,
            ),
            Answer::ScheduleCallRequest { .. } => Self::meeting(to, employee, question),
            _ => return None,
        };
        Some(draft)
    }

    /// Draft shown to the employee, followed by the confirmation prompt.
    pub fn preview(&self) -> String {
        let intro = match self.kind {
            DraftKind::Request => "This request needs HR review. I've drafted an email for you:",
            DraftKind::Unknown => {
                "I don't have an answer for that, but I can ask HR for you. Here's a draft:"
            }
            DraftKind::Approval => "Changes like this need HR approval. I've drafted a request:",
            DraftKind::Meeting => "I can ask HR to set up a meeting. Here's the request:",
        };
        format!(
            "{intro}\n\nTo: {}\nSubject: {}\n\n{}\n\nShould I send this email? (yes / no)",
            self.to, self.subject, self.body
        )
    }
}

fn identity(employee: &Employee) -> (String, String) {
    (
        employee.display_name().to_string(),
        employee.id().unwrap_or("unknown").to_string(),
    )
}

/// A draft awaiting the employee's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEmail {
    pub draft: EmailDraft,
    pub drafted_at: DateTime<Utc>,
}

impl PendingEmail {
    pub fn new(draft: EmailDraft) -> Self {
        Self {
            draft,
            drafted_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Hands a confirmed draft to whatever actually delivers mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, draft: &EmailDraft) -> Result<(), MailError>;
}

/// Reply to a pending-email prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Send,
    Cancel,
}

const CONFIRM_WORDS: &[&str] = &[
    "yes",
    "y",
    "yes please",
    "yes send it",
    "send",
    "send it",
    "sure",
    "ok",
    "okay",
    "confirm",
    "please send",
    "go ahead",
];

const DECLINE_WORDS: &[&str] = &["no", "n", "cancel", "don't send", "do not send", "no thanks"];

/// Interpret a short reply as send / cancel. Anything else is a new question.
pub fn parse_confirmation(reply: &str) -> Option<Confirmation> {
    let reply = reply
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase()
        .replace('’', "'");
    if CONFIRM_WORDS.contains(&reply.as_str()) {
        Some(Confirmation::Send)
    } else if DECLINE_WORDS.contains(&reply.as_str()) {
        Some(Confirmation::Cancel)
    } else {
        None
    }
}
