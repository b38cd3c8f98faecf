//! Shared application state for the Axum server.
//!
//! Supports two modes:
//! - **File mode**: the employee CSV is loaded at startup and every update
//!   is written back to it.
//! - **In-memory mode**: built-in sample employees, nothing persisted
//!   (tests, development, or when the CSV cannot be opened).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};

use hr_core::email::Mailer;
use hr_core::health::{HealthPlan, load_plans_file};
use hr_core::tax::TaxFormGenerator;
use hr_core::{Conversation, EmployeeStore, HrAgent, SessionState};

use crate::config::ApiConfig;
use crate::mailer::LogMailer;
use crate::w2::FileW2Generator;

/// One chat session's pending state, locked for the duration of a turn.
pub type SessionHandle = Arc<Mutex<SessionState>>;

pub struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EmployeeStore>,
    pub conversation: Arc<Conversation>,
    pub tax_forms: Arc<dyn TaxFormGenerator>,
    /// Pending conversation state keyed by session id. Only sessions with
    /// something pending are kept between turns.
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Build state from config, loading the employee and health-plan tables.
    pub fn from_config(config: ApiConfig) -> Self {
        let store = match EmployeeStore::open(&config.employees_csv) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    path = %config.employees_csv.display(),
                    "employee CSV unavailable, using in-memory sample data"
                );
                EmployeeStore::with_sample_data()
            }
        };

        let plans = match &config.health_plans_csv {
            Some(path) => load_plans_file(path).unwrap_or_else(|err| {
                tracing::warn!(error = %err, path = %path.display(), "health plans not loaded");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self::new(store, plans, config)
    }

    /// State with the log mailer and a file-backed W-2 generator.
    pub fn new(store: EmployeeStore, plans: Vec<HealthPlan>, config: ApiConfig) -> Self {
        let tax_forms = Arc::new(FileW2Generator::new(config.w2_output_dir.clone()));
        Self::with_collaborators(store, plans, config, Arc::new(LogMailer::new()), tax_forms)
    }

    pub fn with_collaborators(
        store: EmployeeStore,
        plans: Vec<HealthPlan>,
        config: ApiConfig,
        mailer: Arc<dyn Mailer>,
        tax_forms: Arc<dyn TaxFormGenerator>,
    ) -> Self {
        let store = Arc::new(store);
        let agent = Arc::new(HrAgent::new(store.clone()).with_health_plans(plans));
        let conversation = Arc::new(Conversation::new(
            agent,
            mailer,
            tax_forms.clone(),
            config.hr_email.clone(),
            config.tax_year,
        ));
        Self {
            store,
            conversation,
            tax_forms,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    /// In-memory sample employees, default config (development / tests).
    pub fn with_sample_data() -> Self {
        let config = ApiConfig {
            w2_output_dir: std::env::temp_dir().join("hr-api-tax-documents"),
            ..ApiConfig::default()
        };
        Self::new(EmployeeStore::with_sample_data(), Vec::new(), config)
    }

    /// Session state for `session_id`, created empty on first use. Sessions
    /// idle for longer than the configured TTL are swept first.
    pub async fn session(&self, session_id: &str) -> SessionHandle {
        let now = Instant::now();
        let ttl = self.config.session_ttl();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "expired sessions dropped");
        }

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                handle: SessionHandle::default(),
                last_seen: now,
            });
        entry.last_seen = now;
        entry.handle.clone()
    }

    /// Forget `session_id` if nothing is pending. A session another request
    /// currently holds is left alone.
    pub async fn release_if_idle(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        let idle = sessions
            .get(session_id)
            .is_some_and(|entry| entry.handle.try_lock().is_ok_and(|state| state.is_idle()));
        if idle {
            sessions.remove(session_id);
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
