// src/api/state.rs
use crate::client::{Evaluator, HttpEvaluator};
use crate::config::AppConfig;
use crate::form::AssessmentForm;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared by every worker. The form lock is never held while a request to the
/// evaluation service is outstanding.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub form: Arc<Mutex<AssessmentForm>>,
    pub evaluator: Arc<dyn Evaluator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let evaluator = HttpEvaluator::new(Client::new(), config.service.clone());
        Self::with_evaluator(config, Arc::new(evaluator))
    }

    pub fn with_evaluator(config: AppConfig, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            config: Arc::new(config),
            form: Arc::new(Mutex::new(AssessmentForm::new())),
            evaluator,
        }
    }
}
