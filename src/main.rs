use actix_web::{self, middleware::Logger, web, App, HttpResponse, HttpServer};
use std::sync::Arc;

use crate::{
    configs::connect_mail_relay,
    constants::Env,
    modules::{
        mail::SmtpMailTransport,
        submission::{SubmissionService, UploadPolicy},
    },
};

mod api;
mod configs;
mod constants;
mod modules;
mod utils;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[actix_web::get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(INDEX_HTML)
}

#[actix_web::get("/health")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Environment variables loaded from .env file");

    let env = Env::load().inspect_err(|e| log::error!("{}", e))?;
    let (mail_config, transport) = connect_mail_relay(&env).inspect_err(|e| log::error!("{}", e))?;

    let submission_service = web::Data::new(SubmissionService::new(
        Arc::new(transport),
        mail_config,
        UploadPolicy::with_max_file_size(env.max_file_size),
    ));

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(submission_service.clone())
            .service(index)
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::submission::route::configure::<SmtpMailTransport>),
            )
    })
    .bind((env.ip.as_str(), env.port))?
    .workers(2)
    .run()
    .await
}
