//! Question-answering facade: resolve the employee, classify, compose.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::answer::Answer;
use crate::classifier::IntentClassifier;
use crate::composer::AnswerComposer;
use crate::employee::{Employee, Selector};
use crate::health::HealthPlan;
use crate::intent::Intent;
use crate::store::EmployeeDirectory;

pub const MISSING_IDENTIFIER: &str = "Please provide either an employee_id or first_name.";
pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found in the database.";

/// Result of one question.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub answer: Answer,
    /// `None` when the question never reached the classifier; serialised as
    /// `"error"`.
    #[serde(serialize_with = "intent_or_error")]
    pub intent: Option<Intent>,
    /// The employee record the answer was computed from.
    pub raw_data: Option<Value>,
    #[serde(skip)]
    pub employee: Option<Employee>,
}

impl AgentResponse {
    fn error(message: &str) -> Self {
        Self {
            answer: Answer::plain(message),
            intent: None,
            raw_data: None,
            employee: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.intent.is_none()
    }

    pub fn intent_label(&self) -> &'static str {
        self.intent.map_or("error", Intent::as_str)
    }
}

fn intent_or_error<S: Serializer>(intent: &Option<Intent>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(intent.map_or("error", Intent::as_str))
}

pub struct HrAgent {
    directory: Arc<dyn EmployeeDirectory>,
    classifier: IntentClassifier,
    composer: AnswerComposer,
}

impl HrAgent {
    pub fn new(directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self {
            composer: AnswerComposer::new(directory.clone()),
            classifier: IntentClassifier::new(),
            directory,
        }
    }

    pub fn with_health_plans(mut self, plans: Vec<HealthPlan>) -> Self {
        self.composer = self.composer.with_health_plans(plans);
        self
    }

    pub fn directory(&self) -> &Arc<dyn EmployeeDirectory> {
        &self.directory
    }

    pub fn health_plans(&self) -> &[HealthPlan] {
        self.composer.health_plans()
    }

    /// Answer `question` for the employee named by `selector`.
    ///
    /// Never fails: a missing selector or unknown employee produces an
    /// error-flavoured response with no intent.
    pub async fn answer_question(&self, question: &str, selector: Option<&Selector>) -> AgentResponse {
        let Some(selector) = selector else {
            return AgentResponse::error(MISSING_IDENTIFIER);
        };
        let Some(employee) = self.directory.find(selector).await else {
            tracing::debug!(selector = %selector, "employee not found");
            return AgentResponse::error(EMPLOYEE_NOT_FOUND);
        };

        let intent = self.classifier.classify(question);
        let answer = self.composer.compose(intent, &employee, question).await;
        tracing::debug!(
            selector = %selector,
            intent = %intent,
            action = answer.tag().unwrap_or("plain"),
            "question answered"
        );

        // Re-read so raw_data reflects an update committed this turn.
        let employee = if intent.is_update() {
            self.directory
                .find(&employee.selector())
                .await
                .unwrap_or(employee)
        } else {
            employee
        };

        AgentResponse {
            answer,
            intent: Some(intent),
            raw_data: Some(employee.to_json()),
            employee: Some(employee),
        }
    }
}
