// src/main.rs
mod config;
mod dtos;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web, middleware::Logger};
use log::{error, info};
use reqwest::Client;

use crate::config::{AppConfig, mask_key};
use crate::handlers::{admin_handlers, health_handlers::health};
use crate::middleware::auth_extractor::JwtVerifier;
use crate::repositories::supabase_repo::SupabaseRepo;
use crate::services::assignment_reconciler::AssignmentReconciler;
use crate::services::profile_directory::ProfileDirectory;

#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<ProfileDirectory>,
    pub assignments: Arc<AssignmentReconciler>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Supabase REST: {}", config.rest_url());
    info!("Supabase Key: {}", mask_key(&config.service_role_key));

    let http_client = match Client::builder().user_agent("studio-admin-be/0.1").build() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build http client: {}", e);
            std::process::exit(1);
        }
    };

    let repo = match SupabaseRepo::new(&config, http_client) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            error!("Failed to set up Supabase repository: {}", e);
            std::process::exit(1);
        }
    };

    let profiles = Arc::new(ProfileDirectory::new(repo.clone()));
    let assignments = Arc::new(AssignmentReconciler::new(repo));

    // Assignments rebuild on every new profile list, starting with the empty one.
    Arc::clone(&assignments).follow_profiles(profiles.subscribe());
    tokio::spawn({
        let profiles = Arc::clone(&profiles);
        async move {
            profiles.fetch_profiles().await;
        }
    });

    let state = web::Data::new(AppState { profiles, assignments });
    let verifier = web::Data::new(JwtVerifier::new(&config.jwt_secret));
    let allowed_origins = config.allowed_origins.clone();
    let bind_address = config.bind_address();

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["authorization", "content-type", "accept"])
            .supports_credentials()
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(verifier.clone())
            .service(health)
            .service(web::scope("/api").configure(admin_handlers::configure))
    })
    .bind(&bind_address)?
    .run()
    .await
}
