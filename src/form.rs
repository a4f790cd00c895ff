// src/form.rs
//! State container for the assessment form.
//!
//! Every change to the form goes through [`AssessmentForm::apply`]. A submit that passes
//! validation hands back a [`Submission`]; the caller sends it and feeds the outcome back in
//! as [`FormEvent::SubmitCompleted`]. The form itself never awaits anything, so callers can
//! keep applying field edits while a request is outstanding.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::client::Evaluator;
use crate::errors::{AssessError, Result};
use crate::models::{
    EvaluationResult, Field, FormState, Marks, RequestStatus, SelectedFile, Submission,
};

#[derive(Debug)]
pub enum FormEvent {
    FieldChanged { field: Field, value: String },
    /// `None` is a cancelled file dialog.
    FileSelected(Option<SelectedFile>),
    SubmitRequested,
    SubmitCompleted {
        attempt_id: String,
        outcome: Result<EvaluationResult>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct AssessmentForm {
    fields: FormState,
    file: Option<SelectedFile>,
    status: RequestStatus,
    error: Option<String>,
    result: Option<EvaluationResult>,
    in_flight: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

impl AssessmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FormState {
        &self.fields
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn can_submit(&self) -> bool {
        self.status == RequestStatus::Idle
    }

    /// Applies one event. Returns the payload to send when the event starts a submission.
    pub fn apply(&mut self, event: FormEvent) -> Option<Submission> {
        match event {
            FormEvent::FieldChanged { field, value } => {
                self.set_field(field, value);
                None
            }
            FormEvent::FileSelected(file) => {
                if let Some(file) = file {
                    log::debug!("Selected file '{}' ({} bytes)", file.name, file.bytes.len());
                    self.file = Some(file);
                    self.error = None;
                }
                None
            }
            FormEvent::SubmitRequested => self.begin_submission(),
            FormEvent::SubmitCompleted {
                attempt_id,
                outcome,
            } => {
                self.finish_submission(&attempt_id, outcome);
                None
            }
        }
    }

    fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::Question => self.fields.question = value,
            Field::Solution => self.fields.solution = value,
            Field::Marks => self.fields.marks = Marks::from_input(value),
        }
    }

    fn begin_submission(&mut self) -> Option<Submission> {
        if self.status == RequestStatus::Loading {
            log::debug!(
                "Ignoring submit while attempt {} is in flight",
                self.in_flight.as_deref().unwrap_or("?")
            );
            return None;
        }

        let file = match &self.file {
            Some(file) if !self.fields.solution.is_empty() && !self.fields.question.is_empty() => {
                file.clone()
            }
            _ => {
                log::info!("Submission rejected: missing file, solution or question");
                self.error = Some(AssessError::Validation.user_message());
                return None;
            }
        };

        let attempt_id = Uuid::new_v4().to_string();
        log::info!("Starting evaluation attempt {}", attempt_id);

        self.status = RequestStatus::Loading;
        self.error = None;
        self.result = None;
        self.in_flight = Some(attempt_id.clone());

        Some(Submission {
            attempt_id,
            file,
            text: self.fields.solution.clone(),
            marks: self.fields.marks.clone(),
        })
    }

    fn finish_submission(&mut self, attempt_id: &str, outcome: Result<EvaluationResult>) {
        if self.in_flight.as_deref() != Some(attempt_id) {
            log::warn!("Dropping completion for unknown attempt {}", attempt_id);
            return;
        }

        match outcome {
            Ok(result) => {
                log::info!(
                    "Attempt {} scored {:.1} / {}",
                    attempt_id,
                    result.scaled_score,
                    self.fields.marks
                );
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                log::warn!("Attempt {} failed: {}", attempt_id, e);
                self.result = None;
                self.error = Some(e.user_message());
            }
        }

        self.status = RequestStatus::Idle;
        self.in_flight = None;
        self.completed_at = Some(Utc::now());
    }

    /// Runs a whole submit cycle against `evaluator`, holding the form for its duration.
    ///
    /// Returns `false` when the submit was rejected before any request was made.
    pub async fn submit_with(&mut self, evaluator: &dyn Evaluator) -> bool {
        let Some(submission) = self.apply(FormEvent::SubmitRequested) else {
            return false;
        };
        let outcome = evaluator.evaluate(&submission).await;
        self.apply(FormEvent::SubmitCompleted {
            attempt_id: submission.attempt_id,
            outcome,
        });
        true
    }
}
