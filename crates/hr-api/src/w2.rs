//! File-backed W-2 generator.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use hr_core::tax::{TaxFormError, TaxFormGenerator, W2Statement};

/// Writes rendered W-2 documents into a directory, one file per employee
/// and tax year. Regenerating overwrites the previous file.
#[derive(Debug, Clone)]
pub struct FileW2Generator {
    output_dir: PathBuf,
}

impl FileW2Generator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl TaxFormGenerator for FileW2Generator {
    async fn generate(&self, statement: &W2Statement) -> Result<PathBuf, TaxFormError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(statement.file_name());
        tokio::fs::write(&path, statement.render(Utc::now())).await?;
        tracing::info!(
            path = %path.display(),
            employee_id = statement.employee_id.as_deref().unwrap_or("-"),
            tax_year = statement.tax_year,
            "W-2 written"
        );
        Ok(path)
    }
}
