//! Shared test harness for E2E conversation tests.
//!
//! Runs the real router over a CSV file in a scratch directory, with the
//! real W-2 file generator and a recording mailer.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use hr_api::config::ApiConfig;
use hr_api::routes::build_router;
use hr_api::state::AppState;
use hr_api::w2::FileW2Generator;
use hr_core::EmployeeStore;
use hr_core::health::load_plans;
use hr_core::mock::MockMailer;

pub const EMPLOYEES_CSV: &str = "\
Employee ID,First Name,Salary,Days Off Remaining,Bonus %,Town,Team,Senior Management,Start Date,Manager
EID2480002,Thomas,61933,13,7.5,Harrowgate,Engineering,False,2019-03-11,Priya
EID2480003,Priya,128500,21,15,Leeds,Engineering,True,2014-07-01,
2480010,Sam,52000,nan,,York,Support,No,2023-05-02,Priya
";

pub const PLANS_CSV: &str = "\
Plan Name,Plan Type,Monthly Cost Employee,Monthly Cost Family,Deductible Individual
Gold PPO,PPO,$180,$520,$500
Bronze HDHP,HDHP,$60,$210,$3000
";

/// End-to-end harness: router + on-disk employee table + recording mailer.
pub struct TestHarness {
    pub state: AppState,
    pub router: Router,
    pub mailer: Arc<MockMailer>,
    pub csv_path: PathBuf,
    pub w2_dir: PathBuf,
    /// Keeps the scratch directory alive for the harness lifetime.
    _dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_mailer(MockMailer::new())
    }

    pub fn with_mailer(mailer: MockMailer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("employees.csv");
        std::fs::write(&csv_path, EMPLOYEES_CSV).unwrap();
        let w2_dir = dir.path().join("tax_documents");

        let config = ApiConfig {
            employees_csv: csv_path.clone(),
            health_plans_csv: None,
            w2_output_dir: w2_dir.clone(),
            ..ApiConfig::default()
        };
        let store = EmployeeStore::open(&csv_path).unwrap();
        let plans = load_plans(PLANS_CSV.as_bytes()).unwrap();
        let mailer = Arc::new(mailer);
        let state = AppState::with_collaborators(
            store,
            plans,
            config,
            mailer.clone(),
            Arc::new(FileW2Generator::new(w2_dir.clone())),
        );
        let router = build_router(state.clone());

        Self {
            state,
            router,
            mailer,
            csv_path,
            w2_dir,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// POST /api/ask with an employee id and session.
    pub async fn ask(&self, session_id: &str, employee_id: &str, question: &str) -> (StatusCode, Value) {
        self.ask_raw(json!({
            "question": question,
            "employee_id": employee_id,
            "session_id": session_id,
        }))
        .await
    }

    pub async fn ask_raw(&self, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post("/api/ask")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    pub async fn get_employee(&self, identifier: &str) -> (StatusCode, Value) {
        self.send(
            Request::get(format!("/api/employees/{identifier}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn update_employee(&self, identifier: &str, field: &str, value: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(format!("/api/employees/{identifier}/update"))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({"field": field, "value": value})).unwrap(),
                ))
                .unwrap(),
        )
        .await
    }

    /// GET a URL returned by the API and return status + body text.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Current contents of the employee CSV on disk.
    pub fn csv_contents(&self) -> String {
        std::fs::read_to_string(&self.csv_path).unwrap()
    }
}
