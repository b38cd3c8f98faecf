//! Employee table: lookup by id or first name, and write-through updates.
//!
//! Supports two modes:
//! - **File mode**: backed by a CSV export; every update rewrites the whole
//!   file and reloads it so the next lookup sees exactly what was persisted.
//! - **In-memory mode**: no backing file (tests and development).

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::employee::{Employee, FieldUpdates, Selector};
use crate::error::{StoreError, StoreResult};
use crate::schema::{Field, Schema};

/// Lookup and update operations the assistant needs from the employee table.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Exact id match after trimming whitespace on both sides.
    async fn find_by_id(&self, id: &str) -> Option<Employee>;

    /// Case-insensitive first-name match. Ties resolve to the first row.
    async fn find_by_name(&self, name: &str) -> Option<Employee>;

    /// Write `updates` to the record matched by `selector`. On success the
    /// new values are visible to the very next lookup.
    async fn update(&self, selector: &Selector, updates: &FieldUpdates) -> StoreResult<()>;

    async fn find(&self, selector: &Selector) -> Option<Employee> {
        match selector {
            Selector::Id(id) => self.find_by_id(id).await,
            Selector::Name(name) => self.find_by_name(name).await,
        }
    }
}

const SAMPLE_CSV: &str = "\
Employee ID,First Name,Salary,Days Off Remaining,Bonus %,Town,Team,Senior Management,Start Date,Manager
EID2480002,Thomas,61933,13,7.5,Harrowgate,Engineering,False,2019-03-11,Priya
EID2480003,Priya,128500,21,15,Leeds,Engineering,True,2014-07-01,
EID2480004,Maria,74210.5,6,5,York,Sales,No,2021-01-18,Priya
";

#[derive(Debug, Clone)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    schema: Arc<Schema>,
}

impl Table {
    fn from_reader<R: io::Read>(reader: R) -> StoreResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let schema = Schema::resolve(headers.as_slice());
        if !schema.has(Field::FirstName) {
            return Err(StoreError::MissingColumn(
                Field::FirstName.default_column().to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self {
            headers,
            rows,
            schema: Arc::new(schema),
        })
    }

    fn read(path: &Path) -> StoreResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Write to a sibling temp file, then rename over the original.
    fn persist(&self, path: &Path) -> StoreResult<()> {
        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            writer.write_record(&self.headers)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    fn employee(&self, index: usize) -> Employee {
        Employee::new(self.schema.clone(), &self.headers, &self.rows[index])
    }

    fn column_index(&self, field: Field) -> Option<usize> {
        let column = self.schema.column(field)?;
        self.headers.iter().position(|h| h == column)
    }

    fn position(&self, selector: &Selector) -> Option<usize> {
        match selector {
            Selector::Id(id) => {
                let col = self.column_index(Field::Id)?;
                let id = id.trim();
                self.rows.iter().position(|row| row[col].trim() == id)
            }
            Selector::Name(name) => {
                let col = self.column_index(Field::FirstName)?;
                let name = name.trim().to_lowercase();
                self.rows
                    .iter()
                    .position(|row| row[col].trim().to_lowercase() == name)
            }
        }
    }

    /// Apply updates to one row, appending any column the table lacks.
    fn apply(&mut self, index: usize, updates: &FieldUpdates) {
        for (field, value) in updates.iter() {
            let column = self.schema.column_or_default(field).to_string();
            let col = match self.headers.iter().position(|h| *h == column) {
                Some(col) => col,
                None => {
                    tracing::debug!(column = %column, "appending column to employee table");
                    self.headers.push(column);
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.schema = Arc::new(Schema::resolve(self.headers.as_slice()));
                    self.headers.len() - 1
                }
            };
            self.rows[index][col] = value.to_string();
        }
    }
}

/// CSV-backed employee table guarded by a single read/write lock.
pub struct EmployeeStore {
    path: Option<PathBuf>,
    table: RwLock<Table>,
}

impl EmployeeStore {
    /// Load the table from a CSV file. Updates are persisted back to it.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let table = Table::read(&path)?;
        tracing::info!(
            path = %path.display(),
            employees = table.rows.len(),
            "loaded employee table"
        );
        Ok(Self {
            path: Some(path),
            table: RwLock::new(table),
        })
    }

    /// Parse CSV text into an in-memory table (no persistence).
    pub fn from_csv_str(data: &str) -> StoreResult<Self> {
        Ok(Self {
            path: None,
            table: RwLock::new(Table::from_reader(data.as_bytes())?),
        })
    }

    /// In-memory table with three sample employees (development / tests).
    pub fn with_sample_data() -> Self {
        Self {
            path: None,
            table: RwLock::new(
                Table::from_reader(SAMPLE_CSV.as_bytes()).expect("sample CSV is well-formed"),
            ),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

}

#[async_trait]
impl EmployeeDirectory for EmployeeStore {
    async fn find_by_id(&self, id: &str) -> Option<Employee> {
        let table = self.table.read().await;
        table
            .position(&Selector::Id(id.to_string()))
            .map(|i| table.employee(i))
    }

    async fn find_by_name(&self, name: &str) -> Option<Employee> {
        let table = self.table.read().await;
        table
            .position(&Selector::Name(name.to_string()))
            .map(|i| table.employee(i))
    }

    async fn update(&self, selector: &Selector, updates: &FieldUpdates) -> StoreResult<()> {
        let mut table = self.table.write().await;
        let index = table
            .position(selector)
            .ok_or_else(|| StoreError::NotFound(selector.to_string()))?;

        let mut updated = table.clone();
        updated.apply(index, updates);

        match &self.path {
            Some(path) => {
                let path = path.clone();
                let written = tokio::task::spawn_blocking(move || {
                    updated.persist(&path)?;
                    Table::read(&path)
                })
                .await
                .map_err(|e| StoreError::Io(io::Error::other(e)))?;

                match written {
                    Ok(fresh) => *table = fresh,
                    Err(err) => {
                        tracing::warn!(error = %err, "persist failed, keeping previous table");
                        return Err(err);
                    }
                }
            }
            None => *table = updated,
        }

        tracing::info!(selector = %selector, fields = updates.len(), "employee record updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::FieldValue;
    use std::io::Write;

    const TOWN_CSV: &str = "\
Employee ID,First Name,Salary,Days Off,Town,Team
EID100,Ann,50000,10,Leeds,Sales
 EID200 ,Bob,60000,12,York,Ops
EID300,ann,70000,3,Hull,Ops
";

    fn temp_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn find_by_id_trims_whitespace() {
        let store = EmployeeStore::from_csv_str(TOWN_CSV).unwrap();
        let bob = store.find_by_id("  EID200").await.unwrap();
        assert_eq!(bob.first_name(), Some("Bob"));
    }

    #[tokio::test]
    async fn find_by_name_case_insensitive_first_match() {
        let store = EmployeeStore::from_csv_str(TOWN_CSV).unwrap();
        let ann = store.find_by_name("ANN").await.unwrap();
        assert_eq!(ann.id(), Some("EID100"));
    }

    #[tokio::test]
    async fn unknown_selectors_return_none() {
        let store = EmployeeStore::from_csv_str(TOWN_CSV).unwrap();
        assert!(store.find_by_id("EID999").await.is_none());
        assert!(store.find_by_name("Zed").await.is_none());
        assert!(store.find(&Selector::Name("".into())).await.is_none());
    }

    #[tokio::test]
    async fn accepts_employeeid_header_variant() {
        let store = EmployeeStore::from_csv_str("EmployeeID,First Name\n42,Kim\n").unwrap();
        assert_eq!(store.find_by_id("42").await.unwrap().first_name(), Some("Kim"));
    }

    #[tokio::test]
    async fn missing_first_name_column_is_rejected() {
        let result = EmployeeStore::from_csv_str("Employee ID,Salary\nEID1,10\n");
        assert!(matches!(result, Err(StoreError::MissingColumn(_))));
    }

    #[tokio::test]
    async fn update_is_read_your_writes_on_disk() {
        let file = temp_csv(TOWN_CSV);
        let store = EmployeeStore::open(file.path()).unwrap();

        let updates = FieldUpdates::new().with(Field::Team, "Engineering");
        store
            .update(&Selector::Id("EID100".into()), &updates)
            .await
            .unwrap();

        let ann = store.find_by_id("EID100").await.unwrap();
        assert_eq!(ann.get(Field::Team), Some("Engineering"));

        let reopened = EmployeeStore::open(file.path()).unwrap();
        let ann = reopened.find_by_id("EID100").await.unwrap();
        assert_eq!(ann.get(Field::Team), Some("Engineering"));
    }

    #[tokio::test]
    async fn update_by_name_touches_first_match_only() {
        let store = EmployeeStore::from_csv_str(TOWN_CSV).unwrap();
        let updates = FieldUpdates::new().with(Field::Salary, FieldValue::Integer(99000));
        store
            .update(&Selector::Name("ann".into()), &updates)
            .await
            .unwrap();

        assert_eq!(store.find_by_id("EID100").await.unwrap().salary(), Some(99000.0));
        assert_eq!(store.find_by_id("EID300").await.unwrap().salary(), Some(70000.0));
    }

    #[tokio::test]
    async fn update_appends_missing_column() {
        let file = temp_csv(TOWN_CSV);
        let store = EmployeeStore::open(file.path()).unwrap();
        let updates = FieldUpdates::new()
            .with(Field::Location, "Austin")
            .with(Field::OnSite, FieldValue::Flag(false));
        store
            .update(&Selector::Id("EID200".into()), &updates)
            .await
            .unwrap();

        let bob = store.find_by_id("EID200").await.unwrap();
        assert_eq!(bob.get(Field::Location), Some("Austin"));
        assert_eq!(bob.raw("Town"), Some("Austin"));
        assert_eq!(bob.get(Field::OnSite), Some("No"));

        let ann = store.find_by_id("EID100").await.unwrap();
        assert_eq!(ann.get(Field::OnSite), None);
    }

    #[tokio::test]
    async fn update_unknown_selector_fails() {
        let store = EmployeeStore::with_sample_data();
        let err = store
            .update(
                &Selector::Id("EID000".into()),
                &FieldUpdates::new().with(Field::Team, "Ops"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn persist_failure_reports_error_and_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.csv");
        std::fs::write(&path, TOWN_CSV).unwrap();
        let store = EmployeeStore::open(&path).unwrap();

        // A directory squatting on the temp-file path makes the write fail.
        std::fs::create_dir(path.with_extension("csv.tmp")).unwrap();

        let result = store
            .update(
                &Selector::Id("EID100".into()),
                &FieldUpdates::new().with(Field::Team, "Legal"),
            )
            .await;
        assert!(result.is_err());

        let ann = store.find_by_id("EID100").await.unwrap();
        assert_eq!(ann.get(Field::Team), Some("Sales"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_updates_all_reach_disk() {
        let file = temp_csv(TOWN_CSV);
        let store = Arc::new(EmployeeStore::open(file.path()).unwrap());

        let mut tasks = Vec::new();
        for (id, team) in [("EID100", "Legal"), ("EID200", "Support"), ("EID100", "Finance")] {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .update(
                        &Selector::Id(id.into()),
                        &FieldUpdates::new().with(Field::Team, team),
                    )
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reopened = EmployeeStore::open(file.path()).unwrap();
        let ann = reopened.find_by_id("EID100").await.unwrap();
        assert!(matches!(ann.get(Field::Team), Some("Legal") | Some("Finance")));
        let second = reopened.find_by_id("EID200").await.unwrap();
        assert_eq!(second.get(Field::Team), Some("Support"));
    }

    #[tokio::test]
    async fn sample_data_loads() {
        let store = EmployeeStore::with_sample_data();
        assert_eq!(store.len().await, 3);
        let thomas = store.find_by_name("thomas").await.unwrap();
        assert_eq!(thomas.salary(), Some(61933.0));
        assert_eq!(thomas.location_column(), "Town");
    }
}
