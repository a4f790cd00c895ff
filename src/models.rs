// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum marks exactly as entered in the form.
///
/// The raw text is kept so the value is sent to the service the way the user typed it.
/// Nothing here rejects negative or non-numeric input; the service decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marks(String);

impl Marks {
    pub fn from_input(raw: impl Into<String>) -> Self {
        Marks(raw.into())
    }

    /// `10.0` becomes `"10"` and `8.5` becomes `"8.5"`.
    pub fn from_number(value: f64) -> Self {
        Marks(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed numeric value, if the input is a number.
    pub fn value(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }
}

impl Default for Marks {
    fn default() -> Self {
        Marks::from_number(10.0)
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text inputs of the assessment form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub question: String,
    pub solution: String,
    pub marks: Marks,
}

/// The editable fields of [`FormState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Question,
    Solution,
    Marks,
}

impl std::str::FromStr for Field {
    type Err = crate::errors::AssessError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "question" => Ok(Field::Question),
            "solution" => Ok(Field::Solution),
            "marks" => Ok(Field::Marks),
            other => Err(crate::errors::AssessError::UnknownField(other.to_string())),
        }
    }
}

/// The image picked as the student's answer.
#[derive(Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
}

/// Successful response body of the evaluation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub ocr_text: String,
    pub scaled_score: f64,
}

/// Everything sent to the evaluation service for one attempt.
#[derive(Debug, Clone)]
pub struct Submission {
    pub attempt_id: String,
    pub file: SelectedFile,
    pub text: String,
    pub marks: Marks,
}
