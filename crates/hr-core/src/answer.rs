//! Composer output: a terminal sentence or a follow-up action.
//!
//! Older clients consumed a `"TAG:payload"` string; [`Answer::to_wire`] keeps
//! that encoding available at the edge while the rest of the code matches on
//! variants.

use std::fmt;

use serde::Serialize;

pub const W2_REQUEST: &str = "W2_REQUEST";
pub const SCHEDULE_CALL_REQUEST: &str = "SCHEDULE_CALL_REQUEST";
pub const EMAIL_HR_REQUEST: &str = "EMAIL_HR_REQUEST";
pub const EMAIL_HR_UNKNOWN: &str = "EMAIL_HR_UNKNOWN";
pub const HYBRID_REQUEST: &str = "HYBRID_REQUEST";
pub const LOCATION_UPDATE_REQUEST: &str = "LOCATION_UPDATE_REQUEST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Answer {
    /// User-facing text; nothing else to do this turn.
    Plain { text: String },
    /// Generate a W-2 for the employee and link it.
    W2Request { first_name: String },
    /// Draft a meeting request to HR.
    ScheduleCallRequest { first_name: String },
    /// Policy / exception request: draft an email to HR.
    EmailHrRequest { question: String },
    /// Nothing matched: offer to escalate the question to HR.
    EmailHrUnknown { question: String },
    /// Informational but needs HR approval (relocation, remote work).
    HybridRequest { question: String },
    /// Hold the new location until the employee says remote or on-site.
    LocationUpdateRequest { new_location: String },
}

impl Answer {
    pub fn plain(text: impl Into<String>) -> Self {
        Answer::Plain { text: text.into() }
    }

    /// Sentinel tag for action variants; `None` for plain answers.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Answer::Plain { .. } => None,
            Answer::W2Request { .. } => Some(W2_REQUEST),
            Answer::ScheduleCallRequest { .. } => Some(SCHEDULE_CALL_REQUEST),
            Answer::EmailHrRequest { .. } => Some(EMAIL_HR_REQUEST),
            Answer::EmailHrUnknown { .. } => Some(EMAIL_HR_UNKNOWN),
            Answer::HybridRequest { .. } => Some(HYBRID_REQUEST),
            Answer::LocationUpdateRequest { .. } => Some(LOCATION_UPDATE_REQUEST),
        }
    }

    fn payload(&self) -> &str {
        match self {
            Answer::Plain { text } => text,
            Answer::W2Request { first_name } | Answer::ScheduleCallRequest { first_name } => {
                first_name
            }
            Answer::EmailHrRequest { question }
            | Answer::EmailHrUnknown { question }
            | Answer::HybridRequest { question } => question,
            Answer::LocationUpdateRequest { new_location } => new_location,
        }
    }

    /// `"TAG:payload"` for actions, the text itself for plain answers.
    pub fn to_wire(&self) -> String {
        match self.tag() {
            Some(tag) => format!("{tag}:{}", self.payload()),
            None => self.payload().to_string(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}
