// src/api/handlers/form.rs
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Result};
use futures::TryStreamExt;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::form::FormEvent;
use crate::models::{Field, SelectedFile};
use crate::view::FormView;

#[derive(Deserialize)]
pub struct FieldChangeRequest {
    pub name: String,
    pub value: String,
}

/// GET /api/v1/form - Current view of the form
pub async fn get_form(state: web::Data<AppState>) -> Result<HttpResponse> {
    let form = state.form.lock().await;
    Ok(HttpResponse::Ok().json(FormView::project(&form)))
}

/// PATCH /api/v1/form/field - Update one input
pub async fn change_field(
    state: web::Data<AppState>,
    req: web::Json<FieldChangeRequest>,
) -> Result<HttpResponse> {
    let FieldChangeRequest { name, value } = req.into_inner();

    let field = match name.parse::<Field>() {
        Ok(field) => field,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() })));
        }
    };

    let mut form = state.form.lock().await;
    form.apply(FormEvent::FieldChanged { field, value });
    Ok(HttpResponse::Ok().json(FormView::project(&form)))
}

/// POST /api/v1/form/file - Pick the answer image
///
/// Reads the `file` part. A request without one, or with an empty unnamed one as browsers
/// send for an untouched file input, leaves the current selection alone.
pub async fn select_file(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let limit = state.config.max_upload_bytes;
    let mut selected = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some("file") {
            continue;
        }

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > limit {
                log::warn!("Rejected upload '{}': larger than {} bytes", name, limit);
                return Ok(HttpResponse::PayloadTooLarge().json(json!({
                    "error": format!("Image must be at most {}", describe_limit(limit))
                })));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name.is_empty() && bytes.is_empty() {
            continue;
        }
        selected = Some(SelectedFile::new(name, content_type, bytes));
    }

    let mut form = state.form.lock().await;
    form.apply(FormEvent::FileSelected(selected));
    Ok(HttpResponse::Ok().json(FormView::project(&form)))
}

/// Whole megabytes when the limit is one, bytes otherwise.
fn describe_limit(limit: usize) -> String {
    const MB: usize = 1024 * 1024;
    if limit >= MB && limit % MB == 0 {
        format!("{} MB", limit / MB)
    } else {
        format!("{} bytes", limit)
    }
}

/// POST /api/v1/form/submit - Run one evaluation
///
/// Answers once the attempt has finished. While another attempt is in flight this does
/// nothing and returns the loading view.
pub async fn submit(state: web::Data<AppState>) -> Result<HttpResponse> {
    let submission = state.form.lock().await.apply(FormEvent::SubmitRequested);

    let Some(submission) = submission else {
        let form = state.form.lock().await;
        return Ok(HttpResponse::Ok().json(FormView::project(&form)));
    };

    let outcome = state.evaluator.evaluate(&submission).await;

    let mut form = state.form.lock().await;
    form.apply(FormEvent::SubmitCompleted {
        attempt_id: submission.attempt_id,
        outcome,
    });
    Ok(HttpResponse::Ok().json(FormView::project(&form)))
}
