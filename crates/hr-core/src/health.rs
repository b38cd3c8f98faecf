//! Health-insurance plan table (read-only).

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// One insurance plan offered to employees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthPlan {
    pub name: String,
    /// PPO, HMO, HDHP, ...
    pub plan_type: String,
    pub employee_monthly_cost: String,
    pub family_monthly_cost: String,
    pub deductible: String,
}

const NAME: &[&str] = &["Plan Name", "Name"];
const TYPE: &[&str] = &["Plan Type", "Type"];
const EMPLOYEE_COST: &[&str] = &["Monthly Cost Employee", "Employee Monthly Cost"];
const FAMILY_COST: &[&str] = &["Monthly Cost Family", "Family Monthly Cost"];
const DEDUCTIBLE: &[&str] = &["Deductible Individual", "Deductible"];

/// Load plans from CSV. Header names vary between exports; the plan name
/// column is required, the rest default to empty.
pub fn load_plans<R: io::Read>(reader: R) -> StoreResult<Vec<HealthPlan>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let find = |candidates: &[&str]| {
        candidates
            .iter()
            .find_map(|c| headers.iter().position(|h| h.eq_ignore_ascii_case(c)))
    };
    let name_col = find(NAME).ok_or_else(|| StoreError::MissingColumn("Plan Name".into()))?;
    let type_col = find(TYPE);
    let employee_col = find(EMPLOYEE_COST);
    let family_col = find(FAMILY_COST);
    let deductible_col = find(DEDUCTIBLE);

    let mut plans = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .unwrap_or_default()
                .to_string()
        };
        plans.push(HealthPlan {
            name: cell(Some(name_col)),
            plan_type: cell(type_col),
            employee_monthly_cost: cell(employee_col),
            family_monthly_cost: cell(family_col),
            deductible: cell(deductible_col),
        });
    }
    Ok(plans)
}

pub fn load_plans_file(path: &Path) -> StoreResult<Vec<HealthPlan>> {
    let file = std::fs::File::open(path)?;
    let plans = load_plans(io::BufReader::new(file))?;
    tracing::info!(path = %path.display(), plans = plans.len(), "loaded health plans");
    Ok(plans)
}

/// Human-readable comparison of every plan.
pub fn render_plans(plans: &[HealthPlan]) -> String {
    let blocks: Vec<String> = plans
        .iter()
        .map(|p| {
            format!(
                "{} ({})\n  Employee: {}/month\n  Family: {}/month\n  Deductible: {}\n",
                p.name, p.plan_type, p.employee_monthly_cost, p.family_monthly_cost, p.deductible
            )
        })
        .collect();
    let noun = if plans.len() == 1 { "plan" } else { "plans" };
    format!(
        "We offer {} health insurance {noun}:\n\n{}\nWould you like more details about a specific plan?",
        plans.len(),
        blocks.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANS: &str = "\
Plan Name,Plan Type,Monthly Cost Employee,Monthly Cost Family,Deductible Individual
Basic Care,HMO,$45,$210,$3000
Choice Plus,PPO,$120,$480,$1000
";

    #[test]
    fn loads_primary_headers() {
        let plans = load_plans(PLANS.as_bytes()).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].name, "Choice Plus");
        assert_eq!(plans[1].plan_type, "PPO");
        assert_eq!(plans[1].deductible, "$1000");
    }

    #[test]
    fn loads_alternate_headers() {
        let csv = "Plan Name,Plan Type,Employee Monthly Cost,Family Monthly Cost,Deductible\nSaver,HDHP,$20,$90,$4000\n";
        let plans = load_plans(csv.as_bytes()).unwrap();
        assert_eq!(plans[0].employee_monthly_cost, "$20");
        assert_eq!(plans[0].family_monthly_cost, "$90");
    }

    #[test]
    fn missing_name_column_fails() {
        assert!(load_plans("Type\nPPO\n".as_bytes()).is_err());
    }

    #[test]
    fn render_lists_every_plan() {
        let plans = load_plans(PLANS.as_bytes()).unwrap();
        let text = render_plans(&plans);
        assert!(text.starts_with("We offer 2 health insurance plans:"));
        assert!(text.contains("Basic Care (HMO)\n  Employee: $45/month"));
        assert!(text.contains("Choice Plus (PPO)"));
        assert!(text.ends_with("Would you like more details about a specific plan?"));
    }
}
