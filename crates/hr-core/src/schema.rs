//! Column-name adapter.
//!
//! Employee exports disagree on header names (`Location` vs `Town`,
//! `Days Off Remaining` vs `Days Off`, `Employee ID` vs `EmployeeID`).
//! [`Schema::resolve`] maps every canonical [`Field`] to the header actually
//! present, once per table load, so call sites never probe column names.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical employee attributes understood by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    FirstName,
    Salary,
    DaysOff,
    Bonus,
    Location,
    Team,
    SeniorManagement,
    StartDate,
    Manager,
    OnSite,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::FirstName,
        Field::Salary,
        Field::DaysOff,
        Field::Bonus,
        Field::Location,
        Field::Team,
        Field::SeniorManagement,
        Field::StartDate,
        Field::Manager,
        Field::OnSite,
    ];

    /// Header names accepted for this field, in preference order.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["Employee ID", "EmployeeID"],
            Field::FirstName => &["First Name"],
            Field::Salary => &["Salary"],
            Field::DaysOff => &["Days Off Remaining", "Days Off"],
            Field::Bonus => &["Bonus %"],
            Field::Location => &["Location", "Town"],
            Field::Team => &["Team"],
            Field::SeniorManagement => &["Senior Management"],
            Field::StartDate => &["Start Date"],
            Field::Manager => &["Manager"],
            Field::OnSite => &["On-site", "Onsite", "On Site"],
        }
    }

    /// Header used when the table has none of the candidates.
    ///
    /// Location falls back to `Town`, the column used by the payroll export.
    pub fn default_column(self) -> &'static str {
        match self {
            Field::Location => "Town",
            other => other.candidates()[0],
        }
    }

    /// Map a user-facing field name ("address", "pto", "bonus") to a field.
    pub fn from_alias(name: &str) -> Option<Field> {
        let name = name.trim().to_lowercase();
        let field = match name.as_str() {
            "address" | "town" | "city" | "location" => Field::Location,
            "salary" | "pay" => Field::Salary,
            "bonus" | "bonus %" | "bonus percent" => Field::Bonus,
            "days off" | "days off remaining" | "pto" | "vacation" => Field::DaysOff,
            "team" | "department" => Field::Team,
            "manager" => Field::Manager,
            "start date" => Field::StartDate,
            "on-site" | "onsite" | "on site" => Field::OnSite,
            _ => {
                return Field::ALL.into_iter().find(|f| {
                    f.candidates()
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(&name))
                });
            }
        };
        Some(field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_column())
    }
}

/// Resolved header name for each canonical field present in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: BTreeMap<Field, String>,
}

impl Schema {
    /// Resolve canonical fields against a header row.
    ///
    /// Exact matches win; a case-insensitive match is accepted otherwise.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let headers: Vec<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();
        let mut columns = BTreeMap::new();

        for field in Field::ALL {
            let found = field.candidates().iter().find_map(|candidate| {
                headers.iter().copied().find(|h| h == candidate).or_else(|| {
                    headers
                        .iter()
                        .copied()
                        .find(|h| h.eq_ignore_ascii_case(candidate))
                })
            });
            if let Some(header) = found {
                columns.insert(field, header.to_string());
            }
        }

        Self { columns }
    }

    /// Header present in the table for `field`, if any.
    pub fn column(&self, field: Field) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Header for `field`, or the default name when the table lacks it.
    pub fn column_or_default(&self, field: Field) -> &str {
        self.column(field).unwrap_or(field.default_column())
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }
}
