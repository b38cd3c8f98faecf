//! Employee records, selectors, and update sets.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::format::{is_missing, is_truthy, parse_number};
use crate::schema::{Field, Schema};

/// How a caller identifies an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Exact id match after trimming (`EID2480002`, `1042`).
    Id(String),
    /// Case-insensitive first-name match.
    Name(String),
}

impl Selector {
    /// Build a selector from optional id / name inputs. Id wins when both are set.
    pub fn from_parts(id: Option<&str>, name: Option<&str>) -> Option<Self> {
        fn non_empty(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        non_empty(id)
            .map(|id| Selector::Id(id.to_string()))
            .or_else(|| non_empty(name).map(|n| Selector::Name(n.to_string())))
    }

    /// Interpret a single identifier: `EID…` or all-digit strings are ids,
    /// anything else is a first name.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        let looks_like_id = identifier.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("eid"))
            || identifier.chars().all(|c| c.is_ascii_digit());
        Some(if looks_like_id {
            Selector::Id(identifier.to_string())
        } else {
            Selector::Name(identifier.to_string())
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "id={id}"),
            Selector::Name(name) => write!(f, "name={name}"),
        }
    }
}

/// A typed value written into an employee column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Decimal(n) if n.fract() == 0.0 => write!(f, "{n:.1}"),
            FieldValue::Decimal(n) => write!(f, "{n}"),
            FieldValue::Flag(true) => f.write_str("Yes"),
            FieldValue::Flag(false) => f.write_str("No"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Field → value map for a single update. Setting a field twice keeps the
/// last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdates(BTreeMap<Field, FieldValue>);

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<FieldValue>) -> &mut Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.0.iter().map(|(f, v)| (*f, v))
    }
}

/// One row of the employee table, viewed through the table's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    schema: Arc<Schema>,
    cells: Vec<(String, String)>,
}

impl Employee {
    /// Pair a header row with a data row. Short rows are padded with empty cells.
    pub fn new(schema: Arc<Schema>, headers: &[String], row: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect();
        Self { schema, cells }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Raw cell by header name.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == column)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed value of a canonical field; `None` when the column is absent
    /// or the cell is empty / NaN.
    pub fn get(&self, field: Field) -> Option<&str> {
        let column = self.schema.column(field)?;
        self.raw(column)
            .map(str::trim)
            .filter(|v| !is_missing(v))
    }

    pub fn id(&self) -> Option<&str> {
        self.get(Field::Id)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get(Field::FirstName)
    }

    /// Name used in answers.
    pub fn display_name(&self) -> &str {
        self.first_name().unwrap_or("Employee")
    }

    pub fn salary(&self) -> Option<f64> {
        self.get(Field::Salary).and_then(parse_number)
    }

    pub fn location(&self) -> Option<&str> {
        self.get(Field::Location)
    }

    /// Column that location updates write to: `Location` if present, else `Town`.
    pub fn location_column(&self) -> &str {
        self.schema.column_or_default(Field::Location)
    }

    pub fn is_senior_management(&self) -> bool {
        self.get(Field::SeniorManagement).is_some_and(is_truthy)
    }

    /// Selector that resolves back to this record.
    pub fn selector(&self) -> Selector {
        match self.id() {
            Some(id) => Selector::Id(id.to_string()),
            None => Selector::Name(self.display_name().to_string()),
        }
    }

    /// The full record as JSON, with empty / NaN cells as `null`, numeric
    /// cells as numbers, and `True` / `False` as booleans.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (header, cell) in &self.cells {
            map.insert(header.clone(), normalise_cell(cell));
        }
        Value::Object(map)
    }
}

fn normalise_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if is_missing(trimmed) {
        return Value::Null;
    }
    match trimmed {
        "True" | "true" => return Value::Bool(true),
        "False" | "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(n) = trimmed.parse::<f64>()
        && let Some(num) = serde_json::Number::from_f64(n)
    {
        return Value::Number(num);
    }
    Value::String(trimmed.to_string())
}
