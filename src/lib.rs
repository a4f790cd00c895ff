// src/lib.rs
pub mod config;
pub mod errors;
pub mod models;
pub mod form;
pub mod client;
pub mod view;
pub mod banner;
pub mod cli;
pub mod api;
