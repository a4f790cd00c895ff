// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::client::Evaluator;
use crate::config::SubmissionFile;
use crate::errors::Result;
use crate::form::{AssessmentForm, FormEvent};
use crate::models::Field;
use crate::view::FormView;

#[derive(Parser, Debug)]
#[command(name = "autoeval", version, about = "Submit handwritten answers for automatic assessment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Host the assessment form in the browser (default)
    Serve,
    /// Evaluate one answer described by a TOML file and print the result
    Submit {
        /// Submission file with question, solution, marks and image
        file: PathBuf,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Fills a fresh form from a submission file, the same way a user would.
pub fn fill_form(submission: &SubmissionFile) -> Result<AssessmentForm> {
    let mut form = AssessmentForm::new();
    let edits = [
        (Field::Question, submission.question.clone()),
        (Field::Solution, submission.solution.clone()),
        (Field::Marks, submission.marks().to_string()),
    ];
    for (field, value) in edits {
        form.apply(FormEvent::FieldChanged { field, value });
    }
    form.apply(FormEvent::FileSelected(submission.read_image()?));
    Ok(form)
}

/// Loads `path`, submits it once and returns the final view.
pub async fn submit_file(path: &Path, evaluator: &dyn Evaluator) -> Result<FormView> {
    let submission = SubmissionFile::load(path)?;
    let mut form = fill_form(&submission)?;
    form.submit_with(evaluator).await;
    Ok(FormView::project(&form))
}
