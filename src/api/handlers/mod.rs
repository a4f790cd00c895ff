// src/api/handlers/mod.rs
mod health;
mod form;

pub use health::health_check;
pub use form::{get_form, change_field, select_file, submit, FieldChangeRequest};
