//! W-2 wage and tax statement.
//!
//! The withholding figures are simplified flat rates, not a payroll
//! calculation. Rendering is plain text; the file-backed generator lives in
//! the API crate behind [`TaxFormGenerator`].

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::employee::Employee;
use crate::format::format_currency;

const FEDERAL_RATE: f64 = 0.22;
const SOCIAL_SECURITY_RATE: f64 = 0.062;
const SOCIAL_SECURITY_CAP: f64 = 10_453.20;
const MEDICARE_RATE: f64 = 0.0145;
const STATE_RATE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employer {
    pub name: &'static str,
    pub street: &'static str,
    pub city: &'static str,
    pub ein: &'static str,
}

pub const EMPLOYER: Employer = Employer {
    name: "Dempsey's Company Inc.",
    street: "123 Business Avenue",
    city: "New York, NY 10001",
    ein: "12-3456789",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct W2Statement {
    pub tax_year: i32,
    pub first_name: String,
    pub employee_id: Option<String>,
    pub location: String,
    /// Box 1; also boxes 3 and 5.
    pub wages: f64,
    pub federal_withheld: f64,
    pub social_security_withheld: f64,
    pub medicare_withheld: f64,
    pub state_tax: f64,
    pub local_tax: f64,
}

impl W2Statement {
    /// `None` when the employee has no parsable salary.
    pub fn for_employee(employee: &Employee, tax_year: i32) -> Option<Self> {
        let wages = employee.salary()?;
        Some(Self {
            tax_year,
            first_name: employee.display_name().to_string(),
            employee_id: employee.id().map(str::to_string),
            location: employee.location().unwrap_or("Unknown City").to_string(),
            wages,
            federal_withheld: wages * FEDERAL_RATE,
            social_security_withheld: (wages * SOCIAL_SECURITY_RATE).min(SOCIAL_SECURITY_CAP),
            medicare_withheld: wages * MEDICARE_RATE,
            state_tax: wages * STATE_RATE,
            local_tax: 0.0,
        })
    }

    /// `<employee id>_W2_<year>.txt`, falling back to the first name for
    /// rows without an id.
    pub fn file_name(&self) -> String {
        let key = self.employee_id.as_deref().unwrap_or(&self.first_name);
        w2_file_name(key, self.tax_year)
    }

    pub fn render(&self, generated_at: DateTime<Utc>) -> String {
        let rows = [
            ("1. Wages, tips, other compensation", self.wages),
            ("2. Federal income tax withheld", self.federal_withheld),
            ("3. Social security wages", self.wages),
            ("4. Social security tax withheld", self.social_security_withheld),
            ("5. Medicare wages and tips", self.wages),
            ("6. Medicare tax withheld", self.medicare_withheld),
            ("17. State income tax", self.state_tax),
            ("19. Local income tax", self.local_tax),
        ];

        let mut out = String::new();
        out.push_str("Form W-2 - Wage and Tax Statement                    *** SAMPLE ***\n");
        out.push_str(&format!("Tax Year: {}\n\n", self.tax_year));
        out.push_str("Employer Information:\n");
        for line in [EMPLOYER.name, EMPLOYER.street, EMPLOYER.city] {
            out.push_str(&format!("  {line}\n"));
        }
        out.push_str(&format!("  EIN: {}\n\n", EMPLOYER.ein));
        out.push_str("Employee Information:\n");
        out.push_str(&format!("  {}\n", self.first_name));
        out.push_str(&format!(
            "  Employee ID: {}\n",
            self.employee_id.as_deref().unwrap_or("UNKNOWN")
        ));
        out.push_str(&format!("  {}\n", self.location));
        out.push_str("  SSN: XXX-XX-XXXX\n\n");
        out.push_str("Wages and Taxes:\n");
        for (label, amount) in rows {
            out.push_str(&format!("  {label:<40}{:>16}\n", format_currency(amount)));
        }
        out.push_str("\nThis is a generated document for demonstration purposes.\n");
        out.push_str(&format!(
            "Generated on: {}\n",
            generated_at.format("%B %d, %Y at %I:%M %p")
        ));
        out
    }
}

/// Characters outside `[A-Za-z0-9_-]` become `_` so a key never escapes the
/// output directory.
fn w2_file_name(key: &str, tax_year: i32) -> String {
    let key: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{key}_W2_{tax_year}.txt")
}

#[derive(Debug, thiserror::Error)]
pub enum TaxFormError {
    #[error("failed to write tax form: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces a W-2 document and returns where it was written. Generating
/// again for the same employee and year overwrites the previous document.
#[async_trait]
pub trait TaxFormGenerator: Send + Sync {
    async fn generate(&self, statement: &W2Statement) -> Result<PathBuf, TaxFormError>;
}
