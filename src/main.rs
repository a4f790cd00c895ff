use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, middleware, Responder};
use actix_cors::Cors;
use autoeval::api::{configure_routes, AppState};
use autoeval::banner;
use autoeval::cli::{self, Cli, Command};
use autoeval::client::HttpEvaluator;
use autoeval::config::AppConfig;
use clap::Parser;
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Cli::parse();

    // A missing .env is fine; the defaults cover a local evaluation service.
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };

    match args.command() {
        Command::Serve => serve(app_config).await,
        Command::Submit { file } => {
            let evaluator = HttpEvaluator::new(reqwest::Client::new(), app_config.service.clone());
            match cli::submit_file(&file, &evaluator).await {
                Ok(view) => {
                    println!("{}", view.render_text());
                    if view.error.is_some() {
                        std::process::exit(1);
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(2);
                }
            }
        }
    }
}

async fn serve(app_config: AppConfig) -> std::io::Result<()> {
    banner::print_banner();

    let bind = (app_config.host.clone(), app_config.port);
    println!("🧮 Evaluation service: {}", app_config.service.api_base);
    println!("📝 Form available at http://{}:{}", bind.0, bind.1);

    let state = AppState::new(app_config);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
            .route("/{_:.*}", web::get().to(static_file_handler))
    })
    .bind(bind)?
    .run()
    .await
}

/// Maps a request path onto an embedded asset name; `/` serves the form page.
fn asset_path(request_path: &str) -> &str {
    match request_path.strip_prefix('/').unwrap_or(request_path) {
        "" => "index.html",
        path => path,
    }
}

async fn static_file_handler(req: HttpRequest) -> impl Responder {
    let path = asset_path(req.path());

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(Cow::into_owned(content.data))
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
