//! Multi-turn driver: pending location confirmations and email drafts.
//!
//! [`SessionState`] is owned by the caller (one per chat session) and passed
//! in by `&mut` on every turn. The driver resolves pending state first, then
//! falls back to a fresh question and realises whatever action the composer
//! asked for.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::agent::HrAgent;
use crate::answer::Answer;
use crate::classifier;
use crate::email::{Confirmation, EmailDraft, Mailer, PendingEmail, parse_confirmation};
use crate::employee::{Employee, FieldUpdates, FieldValue, Selector};
use crate::intent::Intent;
use crate::schema::Field;
use crate::tax::{TaxFormGenerator, W2Statement};

/// New location held until the employee says remote or on-site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLocationUpdate {
    pub new_location: String,
    pub employee: Selector,
    pub first_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub pending_location: Option<PendingLocationUpdate>,
    pub pending_email: Option<PendingEmail>,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        self.pending_location.is_none() && self.pending_email.is_none()
    }
}

/// What happened on this turn, beyond the text shown to the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    Answered,
    Error,
    W2Generated,
    EmailDrafted,
    EmailSent,
    EmailFailed,
    EmailCancelled,
    LocationPending,
    LocationUpdated,
}

#[derive(Debug, Clone)]
pub struct TurnReply {
    pub text: String,
    /// Intent label: an [`Intent`] name, `"email_confirmation"` or `"error"`.
    pub intent: &'static str,
    pub action: TurnAction,
    pub raw_data: Option<Value>,
    pub w2_document: Option<PathBuf>,
    pub email_draft: Option<EmailDraft>,
}

impl TurnReply {
    fn new(text: impl Into<String>, intent: &'static str, action: TurnAction) -> Self {
        Self {
            text: text.into(),
            intent,
            action,
            raw_data: None,
            w2_document: None,
            email_draft: None,
        }
    }

    fn with_employee(mut self, employee: Option<&Employee>) -> Self {
        self.raw_data = employee.map(Employee::to_json);
        self
    }

    pub fn is_error(&self) -> bool {
        self.action == TurnAction::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkMode {
    Remote,
    OnSite,
}

static NEGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:not|never|no|dont|wont|cant)\b|n['\x{2019}]t\b").unwrap()
});

/// Affirmative reply such as "remote" or "I'll be in the office". Anything
/// the classifier does not read as a reply, or that is negated, leaves the
/// pending update alone.
fn work_mode_reply(question: &str) -> Option<WorkMode> {
    if classifier::classify(question) != Intent::RemoteResponse {
        return None;
    }
    let lower = question.trim().to_lowercase();
    if NEGATION.is_match(&lower) {
        return None;
    }
    Some(if lower.contains("remote") {
        WorkMode::Remote
    } else {
        WorkMode::OnSite
    })
}

pub struct Conversation {
    agent: Arc<HrAgent>,
    mailer: Arc<dyn Mailer>,
    tax_forms: Arc<dyn TaxFormGenerator>,
    hr_email: String,
    tax_year: i32,
}

impl Conversation {
    pub fn new(
        agent: Arc<HrAgent>,
        mailer: Arc<dyn Mailer>,
        tax_forms: Arc<dyn TaxFormGenerator>,
        hr_email: impl Into<String>,
        tax_year: i32,
    ) -> Self {
        Self {
            agent,
            mailer,
            tax_forms,
            hr_email: hr_email.into(),
            tax_year,
        }
    }

    pub fn agent(&self) -> &Arc<HrAgent> {
        &self.agent
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub async fn handle_turn(
        &self,
        question: &str,
        selector: Option<&Selector>,
        state: &mut SessionState,
    ) -> TurnReply {
        if state.pending_location.is_some()
            && let Some(mode) = work_mode_reply(question)
            && let Some(pending) = state.pending_location.take()
        {
            return self.commit_location(pending, mode).await;
        }

        if state.pending_email.is_some()
            && let Some(confirmation) = parse_confirmation(question)
            && let Some(pending) = state.pending_email.take()
        {
            return self.resolve_email(pending, confirmation).await;
        }

        let response = self.agent.answer_question(question, selector).await;
        if response.is_error() {
            return TurnReply::new(response.answer.to_wire(), "error", TurnAction::Error);
        }
        let intent = response.intent_label();
        let Some(employee) = response.employee else {
            return TurnReply::new(response.answer.to_wire(), intent, TurnAction::Answered);
        };

        let reply = match response.answer {
            Answer::Plain { text } => TurnReply::new(text, intent, TurnAction::Answered),
            Answer::W2Request { .. } => self.generate_w2(&employee, intent).await,
            Answer::LocationUpdateRequest { new_location } => {
                let text = format!(
                    "Thanks! Before I update your location to {new_location}, will you be working remotely or on-site?"
                );
                tracing::debug!(
                    employee = employee.display_name(),
                    new_location = %new_location,
                    "location update awaiting work mode"
                );
                state.pending_location = Some(PendingLocationUpdate {
                    new_location,
                    employee: employee.selector(),
                    first_name: employee.display_name().to_string(),
                });
                TurnReply::new(text, intent, TurnAction::LocationPending)
            }
            answer => match EmailDraft::for_answer(&answer, &self.hr_email, &employee, question) {
                Some(draft) => {
                    if state.pending_email.is_some() {
                        tracing::debug!("replacing unsent email draft");
                    }
                    state.pending_email = Some(PendingEmail::new(draft.clone()));
                    let mut reply =
                        TurnReply::new(draft.preview(), intent, TurnAction::EmailDrafted);
                    reply.email_draft = Some(draft);
                    reply
                }
                None => TurnReply::new(answer.to_wire(), intent, TurnAction::Answered),
            },
        };
        reply.with_employee(Some(&employee))
    }

    async fn commit_location(&self, pending: PendingLocationUpdate, mode: WorkMode) -> TurnReply {
        let intent = Intent::RemoteResponse.as_str();
        let updates = FieldUpdates::new()
            .with(Field::Location, pending.new_location.as_str())
            .with(Field::OnSite, FieldValue::Flag(mode == WorkMode::OnSite));
        let directory = self.agent.directory();

        match directory.update(&pending.employee, &updates).await {
            Ok(()) => {
                let how = match mode {
                    WorkMode::Remote => "working remotely",
                    WorkMode::OnSite => "working on-site",
                };
                tracing::info!(
                    employee = %pending.employee,
                    location = %pending.new_location,
                    remote = mode == WorkMode::Remote,
                    "location update committed"
                );
                let employee = directory.find(&pending.employee).await;
                TurnReply::new(
                    format!(
                        "Got it! I've updated your location to {} and noted that you'll be {how}.",
                        pending.new_location
                    ),
                    intent,
                    TurnAction::LocationUpdated,
                )
                .with_employee(employee.as_ref())
            }
            Err(err) => {
                tracing::warn!(error = %err, employee = %pending.employee, "location update failed");
                TurnReply::new(
                    "Sorry, I couldn't update your information. Please try again.",
                    intent,
                    TurnAction::Error,
                )
            }
        }
    }

    async fn resolve_email(&self, pending: PendingEmail, confirmation: Confirmation) -> TurnReply {
        let draft = pending.draft;
        let (text, action) = match confirmation {
            Confirmation::Cancel => {
                tracing::debug!(subject = %draft.subject, "email draft discarded");
                (
                    "Okay, I won't send that email. Is there anything else I can help with?"
                        .to_string(),
                    TurnAction::EmailCancelled,
                )
            }
            Confirmation::Send => match self.mailer.send(&draft).await {
                Ok(()) => {
                    tracing::info!(to = %draft.to, subject = %draft.subject, "email sent to HR");
                    (
                        format!(
                            "Your email has been sent to HR ({}). They'll get back to you soon.",
                            draft.to
                        ),
                        TurnAction::EmailSent,
                    )
                }
                Err(err) => {
                    tracing::warn!(error = %err, subject = %draft.subject, "email send failed");
                    (
                        "Sorry, I couldn't send the email. Please try again or contact HR directly."
                            .to_string(),
                        TurnAction::EmailFailed,
                    )
                }
            },
        };
        let mut reply = TurnReply::new(text, "email_confirmation", action);
        reply.email_draft = Some(draft);
        reply
    }

    async fn generate_w2(&self, employee: &Employee, intent: &'static str) -> TurnReply {
        let name = employee.display_name();
        let Some(statement) = W2Statement::for_employee(employee, self.tax_year) else {
            tracing::warn!(employee = name, "no salary on record, cannot build W-2");
            return TurnReply::new(
                "I couldn't generate your W-2 because no salary is on record. Please contact HR.",
                intent,
                TurnAction::Error,
            );
        };

        match self.tax_forms.generate(&statement).await {
            Ok(path) => {
                tracing::info!(employee = name, path = %path.display(), "W-2 generated");
                let mut reply = TurnReply::new(
                    format!(
                        "Your {} W-2 for {name} is ready. Use the download link to get your copy.",
                        self.tax_year
                    ),
                    intent,
                    TurnAction::W2Generated,
                );
                reply.w2_document = Some(path);
                reply
            }
            Err(err) => {
                tracing::warn!(error = %err, employee = name, "W-2 generation failed");
                TurnReply::new(
                    "Sorry, I couldn't generate your W-2 right now. Please try again later.",
                    intent,
                    TurnAction::Error,
                )
            }
        }
    }
}
