//! Mail delivery for confirmed HR emails.
//!
//! There is no SMTP transport; confirmed drafts are logged and kept in an
//! in-memory outbox.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use hr_core::email::{EmailDraft, MailError, Mailer};

#[derive(Debug, Clone, Serialize)]
pub struct SentEmail {
    pub draft: EmailDraft,
    pub sent_at: DateTime<Utc>,
}

/// Mailer that logs each email and records it in memory.
#[derive(Clone, Default)]
pub struct LogMailer {
    outbox: Arc<RwLock<Vec<SentEmail>>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outbox(&self) -> Vec<SentEmail> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, draft: &EmailDraft) -> Result<(), MailError> {
        tracing::info!(
            to = %draft.to,
            subject = %draft.subject,
            employee_id = %draft.employee_id,
            "HR email delivered (log transport)"
        );
        self.outbox.write().await.push(SentEmail {
            draft: draft.clone(),
            sent_at: Utc::now(),
        });
        Ok(())
    }
}
