// src/view.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::form::AssessmentForm;
use crate::models::{RequestStatus, Marks};

pub const SUBMIT_LABEL: &str = "Evaluate Answer";
pub const BUSY_LABEL: &str = "Evaluating...";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubmitControl {
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultView {
    pub ocr_text: String,
    pub scaled_score: f64,
    pub extracted_line: String,
    pub score_line: String,
}

/// What the form shows, derived from an [`AssessmentForm`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FormView {
    pub question: String,
    pub solution: String,
    pub marks: Marks,
    pub file_name: Option<String>,
    pub status: RequestStatus,
    pub submit: SubmitControl,
    pub error: Option<String>,
    pub result: Option<ResultView>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl FormView {
    pub fn project(form: &AssessmentForm) -> Self {
        let loading = form.status() == RequestStatus::Loading;
        let fields = form.fields();

        FormView {
            question: fields.question.clone(),
            solution: fields.solution.clone(),
            marks: fields.marks.clone(),
            file_name: form.file().map(|f| f.name.clone()),
            status: form.status(),
            submit: SubmitControl {
                label: if loading { BUSY_LABEL } else { SUBMIT_LABEL },
                disabled: loading,
                busy: loading,
            },
            error: form.error().map(str::to_string),
            result: form.result().map(|r| ResultView {
                ocr_text: r.ocr_text.clone(),
                scaled_score: r.scaled_score,
                extracted_line: format!("Extracted Answer: {}", r.ocr_text),
                score_line: score_line(r.scaled_score, &fields.marks),
            }),
            completed_at: form.completed_at(),
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
        }
        if let Some(result) = &self.result {
            lines.push(result.extracted_line.clone());
            lines.push(result.score_line.clone());
        }
        if lines.is_empty() {
            lines.push(self.submit.label.to_string());
        }
        lines.join("\n")
    }
}

/// `Score: 8.5 / 10`. The score always has one decimal; marks are shown as entered.
pub fn score_line(scaled_score: f64, marks: &Marks) -> String {
    format!("Score: {:.1} / {}", scaled_score, marks)
}
