// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/form")
                    .route("", web::get().to(handlers::get_form))
                    .route("/field", web::patch().to(handlers::change_field))
                    .route("/file", web::post().to(handlers::select_file))
                    .route("/submit", web::post().to(handlers::submit))
            )
    );
}
