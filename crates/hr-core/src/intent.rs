use std::fmt;

use serde::{Deserialize, Serialize};

/// What the employee is asking for. Closed set; `Unknown` is escalated to HR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Salary,
    DaysOff,
    Bonus,
    WorkLocation,
    Team,
    Manager,
    StartDate,
    ScheduleCall,
    EmailHrRequest,
    HealthInsurance,
    RemoteResponse,
    W2,
    UpdateAddress,
    UpdateInfo,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Salary => "salary",
            Intent::DaysOff => "days_off",
            Intent::Bonus => "bonus",
            Intent::WorkLocation => "work_location",
            Intent::Team => "team",
            Intent::Manager => "manager",
            Intent::StartDate => "start_date",
            Intent::ScheduleCall => "schedule_call",
            Intent::EmailHrRequest => "email_hr_request",
            Intent::HealthInsurance => "health_insurance",
            Intent::RemoteResponse => "remote_response",
            Intent::W2 => "w2",
            Intent::UpdateAddress => "update_address",
            Intent::UpdateInfo => "update_info",
            Intent::Unknown => "unknown",
        }
    }

    /// Intents that modify the employee record.
    pub fn is_update(self) -> bool {
        matches!(self, Intent::UpdateAddress | Intent::UpdateInfo)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_matches_as_str() {
        for intent in [Intent::DaysOff, Intent::W2, Intent::EmailHrRequest, Intent::Unknown] {
            let json = serde_json::to_value(intent).unwrap();
            assert_eq!(json, intent.as_str());
        }
    }
}
