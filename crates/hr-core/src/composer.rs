//! Intent → answer dispatch.

use std::sync::Arc;

use crate::answer::Answer;
use crate::employee::{Employee, FieldUpdates};
use crate::extractor;
use crate::format::{format_currency, is_truthy, parse_number};
use crate::health::{HealthPlan, render_plans};
use crate::intent::Intent;
use crate::schema::Field;
use crate::store::EmployeeDirectory;

const CLARIFY_UPDATE: &str = "I'd like to help you update your information. Please tell me what you'd like to change. For example: 'Change my address to Miami' or 'Update my team to Engineering'.";
const UPDATE_FAILED: &str = "Sorry, I couldn't update your information. Please try again.";
const NO_HEALTH_PLANS: &str = "I don't have health insurance information loaded. Let me connect you with HR to discuss your benefits options.";

/// Produces the answer for a classified question.
///
/// Lookups never fail: a missing column or unparsable cell degrades to a
/// "not available" sentence. Only non-location updates touch the store from
/// here; location changes are deferred via [`Answer::LocationUpdateRequest`].
pub struct AnswerComposer {
    directory: Arc<dyn EmployeeDirectory>,
    health_plans: Option<Arc<[HealthPlan]>>,
}

impl AnswerComposer {
    pub fn new(directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self {
            directory,
            health_plans: None,
        }
    }

    pub fn with_health_plans(mut self, plans: Vec<HealthPlan>) -> Self {
        self.health_plans = Some(plans.into());
        self
    }

    pub fn health_plans(&self) -> &[HealthPlan] {
        self.health_plans.as_deref().unwrap_or_default()
    }

    pub async fn compose(&self, intent: Intent, employee: &Employee, question: &str) -> Answer {
        let name = employee.display_name();
        let lower = question.to_lowercase();

        match intent {
            Intent::Salary => match employee.salary() {
                Some(salary) => Answer::plain(format!(
                    "{name}'s salary is {} per year.",
                    format_currency(salary)
                )),
                None => not_available(name, "salary"),
            },

            Intent::DaysOff => match employee.get(Field::DaysOff) {
                Some(days) => Answer::plain(format!(
                    "{name} has {} days off remaining this year.",
                    whole_number(days)
                )),
                None => not_available(name, "days off"),
            },

            Intent::Bonus => match employee.get(Field::Bonus) {
                Some(bonus) => Answer::plain(format!("{name}'s bonus percentage is {bonus}%.")),
                None => not_available(name, "bonus"),
            },

            Intent::WorkLocation => {
                if location_needs_approval(&lower) {
                    return Answer::HybridRequest {
                        question: question.to_string(),
                    };
                }
                describe_location(employee, &lower)
            }

            Intent::Team => match employee.get(Field::Team) {
                Some(team) => Answer::plain(format!("{name} is on the {team} team.")),
                None => not_available(name, "team"),
            },

            Intent::Manager => {
                if lower.contains("who")
                    && let Some(manager) = employee.get(Field::Manager)
                {
                    return Answer::plain(format!("{name}'s manager is {manager}."));
                }
                if employee.is_senior_management() {
                    Answer::plain(format!("{name} is part of senior management."))
                } else {
                    Answer::plain(format!("{name} is not part of senior management."))
                }
            }

            Intent::StartDate => match employee.get(Field::StartDate) {
                Some(date) => Answer::plain(format!("{name} started on {date}.")),
                None => not_available(name, "start date"),
            },

            Intent::W2 => Answer::W2Request {
                first_name: name.to_string(),
            },

            Intent::ScheduleCall => Answer::ScheduleCallRequest {
                first_name: name.to_string(),
            },

            Intent::HealthInsurance => match self.health_plans.as_deref() {
                Some(plans) if !plans.is_empty() => Answer::plain(render_plans(plans)),
                _ => Answer::plain(NO_HEALTH_PLANS),
            },

            Intent::EmailHrRequest => Answer::EmailHrRequest {
                question: question.to_string(),
            },

            Intent::UpdateAddress | Intent::UpdateInfo => {
                if update_needs_approval(&lower) {
                    return Answer::HybridRequest {
                        question: question.to_string(),
                    };
                }
                self.apply_update(employee, question).await
            }

            Intent::RemoteResponse | Intent::Unknown => Answer::EmailHrUnknown {
                question: question.to_string(),
            },
        }
    }

    async fn apply_update(&self, employee: &Employee, question: &str) -> Answer {
        let name = employee.display_name();
        let Some(updates) = extractor::extract(question, employee) else {
            return Answer::plain(CLARIFY_UPDATE);
        };

        if let Some(location) = updates.get(Field::Location) {
            return Answer::LocationUpdateRequest {
                new_location: location.to_string(),
            };
        }

        match self.directory.update(&employee.selector(), &updates).await {
            Ok(()) => Answer::plain(format!(
                "Successfully updated {} for {name}.",
                describe_updates(employee, &updates)
            )),
            Err(err) => {
                tracing::warn!(error = %err, employee = name, "employee update failed");
                Answer::plain(UPDATE_FAILED)
            }
        }
    }
}

fn not_available(name: &str, what: &str) -> Answer {
    Answer::plain(format!("{name}'s {what} information is not available."))
}

/// `13.0` → `13`; anything non-integral is shown as stored.
fn whole_number(raw: &str) -> String {
    match parse_number(raw) {
        Some(n) if n.fract() == 0.0 => format!("{n:.0}"),
        _ => raw.to_string(),
    }
}

/// "Team to Sales, Salary to 85000" using the table's own column names.
pub fn describe_updates(employee: &Employee, updates: &FieldUpdates) -> String {
    updates
        .iter()
        .map(|(field, value)| {
            format!("{} to {value}", employee.schema().column_or_default(field))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_location(employee: &Employee, lower: &str) -> Answer {
    let name = employee.display_name();
    let Some(location) = employee.location() else {
        return not_available(name, "location");
    };

    let asking_about_home = ["live", "home", "residing", "based"]
        .iter()
        .any(|w| lower.contains(w));
    if asking_about_home {
        return Answer::plain(format!("{name} lives in {location}."));
    }

    let remote = employee.get(Field::OnSite).is_some_and(|v| !is_truthy(v));
    if remote {
        Answer::plain(format!("{name} works remotely from {location}."))
    } else {
        Answer::plain(format!("{name} works on-site in {location}."))
    }
}

/// "Can I move / work remote?" style questions need HR sign-off.
fn location_needs_approval(lower: &str) -> bool {
    let has = |s: &str| lower.contains(s);
    let can_i = has("can i");
    (can_i && (has("move") || has("relocate") || has("work remote") || has("work from")))
        || (has("permission") && (has("move") || has("remote")))
        || (has("allowed to") && (has("move") || has("remote")))
}

fn update_needs_approval(lower: &str) -> bool {
    let has = |s: &str| lower.contains(s);
    (has("can i") && (has("move") || has("relocate") || has("work remote")))
        || has("permission")
        || has("allowed to")
        || (has("policy") && (has("remote") || has("work from")))
        || has("approval")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Selector;
    use crate::error::{StoreError, StoreResult};
    use crate::health::load_plans;
    use crate::store::EmployeeStore;
    use async_trait::async_trait;

    const CSV: &str = "\
Employee ID,First Name,Salary,Days Off Remaining,Bonus %,Town,Team,Senior Management,Start Date,Manager
EID1,Thomas,61933.00,13,7.5,Harrowgate,Engineering,Yes,2019-03-11,Priya
EID2,Sam,,nan,,,,False,,
";

    fn store() -> Arc<EmployeeStore> {
        Arc::new(EmployeeStore::from_csv_str(CSV).unwrap())
    }

    async fn answer(intent: Intent, who: &str, question: &str) -> Answer {
        let store = store();
        let employee = store.find_by_id(who).await.unwrap();
        AnswerComposer::new(store)
            .compose(intent, &employee, question)
            .await
    }

    fn text(a: Answer) -> String {
        match a {
            Answer::Plain { text } => text,
            other => panic!("expected plain answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn salary_formatted_with_separators() {
        let a = text(answer(Intent::Salary, "EID1", "What's my salary?").await);
        assert_eq!(a, "Thomas's salary is $61,933.00 per year.");
    }

    #[tokio::test]
    async fn direct_lookups() {
        assert_eq!(
            text(answer(Intent::DaysOff, "EID1", "days off?").await),
            "Thomas has 13 days off remaining this year."
        );
        assert_eq!(
            text(answer(Intent::Bonus, "EID1", "bonus?").await),
            "Thomas's bonus percentage is 7.5%."
        );
        assert_eq!(
            text(answer(Intent::Team, "EID1", "team?").await),
            "Thomas is on the Engineering team."
        );
        assert_eq!(
            text(answer(Intent::StartDate, "EID1", "start date?").await),
            "Thomas started on 2019-03-11."
        );
    }

    #[tokio::test]
    async fn manager_answers() {
        assert_eq!(
            text(answer(Intent::Manager, "EID1", "am I senior management?").await),
            "Thomas is part of senior management."
        );
        assert_eq!(
            text(answer(Intent::Manager, "EID1", "who is my manager?").await),
            "Thomas's manager is Priya."
        );
        assert_eq!(
            text(answer(Intent::Manager, "EID2", "who is my manager?").await),
            "Sam is not part of senior management."
        );
    }

    #[tokio::test]
    async fn missing_values_degrade() {
        for (intent, what) in [
            (Intent::Salary, "salary"),
            (Intent::DaysOff, "days off"),
            (Intent::Bonus, "bonus"),
            (Intent::Team, "team"),
            (Intent::WorkLocation, "location"),
        ] {
            let a = text(answer(intent, "EID2", "question").await);
            assert_eq!(a, format!("Sam's {what} information is not available."));
        }
    }

    #[tokio::test]
    async fn work_location_phrasing() {
        assert_eq!(
            text(answer(Intent::WorkLocation, "EID1", "Where do I live?").await),
            "Thomas lives in Harrowgate."
        );
        assert_eq!(
            text(answer(Intent::WorkLocation, "EID1", "Do I work in person?").await),
            "Thomas works on-site in Harrowgate."
        );
    }

    #[tokio::test]
    async fn work_location_policy_question_is_hybrid() {
        let a = answer(Intent::WorkLocation, "EID1", "Can I move to Spain?").await;
        assert_eq!(a.tag(), Some("HYBRID_REQUEST"));
        let a = answer(Intent::WorkLocation, "EID1", "Am I allowed to work remote?").await;
        assert_eq!(a.to_wire(), "HYBRID_REQUEST:Am I allowed to work remote?");
    }

    #[tokio::test]
    async fn action_sentinels() {
        assert_eq!(
            answer(Intent::W2, "EID1", "w2").await.to_wire(),
            "W2_REQUEST:Thomas"
        );
        assert_eq!(
            answer(Intent::ScheduleCall, "EID1", "book a call").await.to_wire(),
            "SCHEDULE_CALL_REQUEST:Thomas"
        );
        assert_eq!(
            answer(Intent::EmailHrRequest, "EID1", "Is it possible?").await.to_wire(),
            "EMAIL_HR_REQUEST:Is it possible?"
        );
        assert_eq!(
            answer(Intent::Unknown, "EID1", "asdfghjkl").await.to_wire(),
            "EMAIL_HR_UNKNOWN:asdfghjkl"
        );
    }

    #[tokio::test]
    async fn health_plans_rendered_or_fallback() {
        let store = store();
        let employee = store.find_by_id("EID1").await.unwrap();

        let a = AnswerComposer::new(store.clone())
            .compose(Intent::HealthInsurance, &employee, "plans?")
            .await;
        assert_eq!(text(a), NO_HEALTH_PLANS);

        let plans = load_plans("Plan Name,Plan Type\nBasic,HMO\n".as_bytes()).unwrap();
        let a = AnswerComposer::new(store)
            .with_health_plans(plans)
            .compose(Intent::HealthInsurance, &employee, "plans?")
            .await;
        assert!(text(a).contains("Basic (HMO)"));
    }

    #[tokio::test]
    async fn location_update_is_deferred() {
        let store = store();
        let employee = store.find_by_id("EID1").await.unwrap();
        let a = AnswerComposer::new(store.clone())
            .compose(Intent::UpdateInfo, &employee, "I'm moving to Austin")
            .await;
        assert_eq!(a.to_wire(), "LOCATION_UPDATE_REQUEST:Austin");

        let unchanged = store.find_by_id("EID1").await.unwrap();
        assert_eq!(unchanged.location(), Some("Harrowgate"));
    }

    #[tokio::test]
    async fn non_location_update_commits() {
        let store = store();
        let employee = store.find_by_id("EID1").await.unwrap();
        let a = AnswerComposer::new(store.clone())
            .compose(Intent::UpdateInfo, &employee, "change my team to sales")
            .await;
        assert_eq!(text(a), "Successfully updated Team to Sales for Thomas.");
        assert_eq!(
            store.find_by_id("EID1").await.unwrap().get(Field::Team),
            Some("Sales")
        );
    }

    #[tokio::test]
    async fn unparseable_update_asks_again() {
        let a = answer(Intent::UpdateInfo, "EID1", "update my stuff please").await;
        assert_eq!(text(a), CLARIFY_UPDATE);
    }

    #[tokio::test]
    async fn update_with_approval_phrasing_is_hybrid() {
        let a = answer(Intent::UpdateAddress, "EID1", "Do I need approval to move to Leeds?").await;
        assert_eq!(a.tag(), Some("HYBRID_REQUEST"));
    }

    struct FailingDirectory(Arc<EmployeeStore>);

    #[async_trait]
    impl EmployeeDirectory for FailingDirectory {
        async fn find_by_id(&self, id: &str) -> Option<Employee> {
            self.0.find_by_id(id).await
        }

        async fn find_by_name(&self, name: &str) -> Option<Employee> {
            self.0.find_by_name(name).await
        }

        async fn update(&self, _: &Selector, _: &FieldUpdates) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[tokio::test]
    async fn persistence_failure_is_reported() {
        let store = store();
        let employee = store.find_by_id("EID1").await.unwrap();
        let composer = AnswerComposer::new(Arc::new(FailingDirectory(store)));
        let a = composer
            .compose(Intent::UpdateInfo, &employee, "set my salary to 90,000")
            .await;
        assert_eq!(text(a), UPDATE_FAILED);
    }
}
