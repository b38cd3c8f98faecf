//! "Change X to Y" update-request extraction.
//!
//! A fixed sequence of independent regex rules runs over the lower-cased
//! request. Rules are not exclusive: every rule that matches writes its
//! field, and a later rule overwrites an earlier one that wrote the same
//! field ("move to Miami, relocated to Denver" ends up as Denver).

use std::sync::LazyLock;

use regex::Regex;

use crate::employee::{Employee, FieldUpdates, FieldValue};
use crate::format::title_case;
use crate::schema::Field;

/// How a captured value becomes a field value.
#[derive(Debug, Clone, Copy)]
enum Capture {
    /// Free text, title-cased.
    Text,
    /// Integer with optional thousands separators.
    Integer,
    /// Decimal number.
    Decimal,
}

struct ExtractionRule {
    name: &'static str,
    field: Field,
    capture: Capture,
    regex: Regex,
}

const RULE_TABLE: &[(&str, Field, Capture, &str)] = &[
    (
        "contextual",
        Field::Location,
        Capture::Text,
        r"(?:update|change|set|make)\s+(?:that|it)\s+to\s+([a-zA-Z\s]+?)(?:\.|$|,)",
    ),
    (
        "move",
        Field::Location,
        Capture::Text,
        r"mov(?:e|ing)\s+to\s+([a-zA-Z\s]+?)(?:\.|$|,|\sand\s)",
    ),
    (
        "change_location",
        Field::Location,
        Capture::Text,
        r"(?:change|update|set|modify)\s+(?:my\s+)?(?:address|town|city|location)\s+to\s+([a-zA-Z\s]+?)(?:\.|$|,)",
    ),
    (
        "change_team",
        Field::Team,
        Capture::Text,
        r"(?:change|update|set|modify)\s+(?:my\s+)?team\s+to\s+([a-zA-Z\s]+?)(?:\.|$|,)",
    ),
    (
        "change_salary",
        Field::Salary,
        Capture::Integer,
        r"(?:change|update|set|modify)\s+(?:my\s+)?salary\s+to\s+([0-9,]+)",
    ),
    (
        "change_bonus",
        Field::Bonus,
        Capture::Decimal,
        r"(?:change|update|set|modify)\s+(?:my\s+)?bonus\s+to\s+([0-9.]+)",
    ),
    (
        "relocated",
        Field::Location,
        Capture::Text,
        r"(?:relocated|transferred|reassigned)\s+to\s+([a-zA-Z\s]+?)(?:\.|$|,)",
    ),
];

static RULES: LazyLock<Vec<ExtractionRule>> = LazyLock::new(|| {
    RULE_TABLE
        .iter()
        .map(|(name, field, capture, pattern)| ExtractionRule {
            name: *name,
            field: *field,
            capture: *capture,
            regex: Regex::new(pattern).unwrap(),
        })
        .collect()
});

/// Extract a field → value update map from a free-text request.
///
/// Returns `None` when no rule produced a value; the caller should ask the
/// employee to restate the request. A malformed number drops only that
/// field.
pub fn extract(question: &str, employee: &Employee) -> Option<FieldUpdates> {
    let lower = question.to_lowercase();
    let mut updates = FieldUpdates::new();

    for rule in RULES.iter() {
        let Some(caps) = rule.regex.captures(&lower) else {
            continue;
        };
        let raw = caps[1].trim();
        match convert(raw, rule.capture) {
            Some(value) => {
                if let Some(previous) = updates.get(rule.field) {
                    tracing::debug!(
                        rule = rule.name,
                        field = %rule.field,
                        previous = %previous,
                        "later extraction rule overwrites earlier value"
                    );
                }
                updates.set(rule.field, value);
            }
            None => {
                tracing::debug!(rule = rule.name, value = raw, "discarding malformed numeric value");
            }
        }
    }

    if updates.is_empty() {
        return None;
    }
    if updates.contains(Field::Location) {
        tracing::debug!(column = employee.location_column(), "location update targets column");
    }
    Some(updates)
}

fn convert(raw: &str, capture: Capture) -> Option<FieldValue> {
    match capture {
        Capture::Text => (!raw.is_empty()).then(|| FieldValue::Text(title_case(raw))),
        Capture::Integer => raw.replace(',', "").parse().ok().map(FieldValue::Integer),
        Capture::Decimal => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FieldValue::Decimal),
    }
}
