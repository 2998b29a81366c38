// src/handlers/admin_handlers.rs
use actix_web::{get, post, web, HttpResponse};
use log::info;
use serde::Serialize;

use crate::dtos::admin::{ApiResponse, AssignmentsOut, ProfilesOut};
use crate::middleware::auth_extractor::AdminUser;
use crate::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_profiles)
        .service(refetch_profiles)
        .service(list_class_assignments)
        .service(refetch_class_assignments);
}

/// 200 with the state, or 500 carrying the same state when the last fetch failed.
fn respond<T: Serialize>(ok_message: &str, error: Option<&str>, data: T) -> HttpResponse {
    match error {
        None => HttpResponse::Ok().json(ApiResponse::success(ok_message, data)),
        Some(message) => HttpResponse::InternalServerError().json(ApiResponse::error(message, Some(data))),
    }
}

/// GET /api/admin/profiles
#[get("/admin/profiles")]
pub async fn list_profiles(app_state: web::Data<AppState>, _user: AdminUser) -> HttpResponse {
    let out = ProfilesOut::from(app_state.profiles.snapshot().await);
    let error = out.error.clone();
    respond("Profiles retrieved successfully", error.as_deref(), out)
}

/// POST /api/admin/profiles/refetch
#[post("/admin/profiles/refetch")]
pub async fn refetch_profiles(app_state: web::Data<AppState>, user: AdminUser) -> HttpResponse {
    info!("Profile refetch requested by {}", user.user_id);
    let out = ProfilesOut::from(app_state.profiles.refetch().await);
    let error = out.error.clone();
    respond("Profiles reloaded", error.as_deref(), out)
}

/// GET /api/admin/class-assignments
#[get("/admin/class-assignments")]
pub async fn list_class_assignments(app_state: web::Data<AppState>, _user: AdminUser) -> HttpResponse {
    let out = AssignmentsOut::from(app_state.assignments.snapshot().await);
    let error = out.error.clone();
    respond("Class assignments retrieved successfully", error.as_deref(), out)
}

/// POST /api/admin/class-assignments/refetch
#[post("/admin/class-assignments/refetch")]
pub async fn refetch_class_assignments(app_state: web::Data<AppState>, user: AdminUser) -> HttpResponse {
    info!("Assignment refetch requested by {}", user.user_id);
    let profiles = app_state.profiles.current();
    let out = AssignmentsOut::from(app_state.assignments.fetch_and_reconcile(profiles).await);
    let error = out.error.clone();
    respond("Class assignments reloaded", error.as_deref(), out)
}
