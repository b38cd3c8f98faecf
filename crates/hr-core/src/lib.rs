//! HR assistant core: deterministic question answering over an employee table.
//!
//! Maps free-text employee questions to a fixed set of intents with ordered
//! pattern rules, extracts "change X to Y" update requests, and composes
//! either a plain answer or a typed follow-up action (W-2, email draft,
//! location confirmation) for the transport layer to realise.

pub mod agent;
pub mod answer;
pub mod classifier;
pub mod composer;
pub mod conversation;
pub mod email;
pub mod employee;
pub mod error;
pub mod extractor;
pub mod format;
pub mod health;
pub mod intent;
pub mod mock;
pub mod schema;
pub mod store;
pub mod tax;

pub use agent::{AgentResponse, HrAgent};
pub use answer::Answer;
pub use classifier::IntentClassifier;
pub use composer::AnswerComposer;
pub use conversation::{Conversation, PendingLocationUpdate, SessionState, TurnAction, TurnReply};
pub use email::{EmailDraft, MailError, Mailer, PendingEmail};
pub use employee::{Employee, FieldUpdates, FieldValue, Selector};
pub use error::{StoreError, StoreResult};
pub use health::HealthPlan;
pub use intent::Intent;
pub use schema::{Field, Schema};
pub use store::{EmployeeDirectory, EmployeeStore};
pub use tax::{TaxFormError, TaxFormGenerator, W2Statement};
