//! Mock collaborators for testing.
//!
//! Record every call so tests can assert on what would have been mailed or
//! generated without touching SMTP or the filesystem.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::email::{EmailDraft, MailError, Mailer};
use crate::tax::{TaxFormError, TaxFormGenerator, W2Statement};

/// Mailer that records drafts instead of sending them.
pub struct MockMailer {
    sent: Mutex<Vec<EmailDraft>>,
    fail: AtomicBool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// A mailer whose every send fails.
    pub fn failing() -> Self {
        let mailer = Self::new();
        mailer.set_failing(true);
        mailer
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Copies of every successfully sent draft.
    pub fn sent(&self) -> Vec<EmailDraft> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Option<EmailDraft> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, draft: &EmailDraft) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("mock transport down".into()));
        }
        self.sent.lock().unwrap().push(draft.clone());
        Ok(())
    }
}

/// Tax-form generator that records statements and returns a path under a
/// fixed directory without writing anything.
pub struct MockTaxForms {
    dir: PathBuf,
    generated: Mutex<Vec<W2Statement>>,
}

impl MockTaxForms {
    pub fn new() -> Self {
        Self {
            dir: PathBuf::from("tax_documents"),
            generated: Mutex::new(Vec::new()),
        }
    }

    pub fn generated(&self) -> Vec<W2Statement> {
        self.generated.lock().unwrap().clone()
    }
}

impl Default for MockTaxForms {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaxFormGenerator for MockTaxForms {
    async fn generate(&self, statement: &W2Statement) -> Result<PathBuf, TaxFormError> {
        self.generated.lock().unwrap().push(statement.clone());
        Ok(self.dir.join(statement.file_name()))
    }
}
