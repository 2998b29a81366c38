// src/middleware/auth_extractor.rs
use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use actix_web::error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, error, warn};
use serde::Deserialize;
use uuid::Uuid;

const SESSION_AUDIENCE: &str = "authenticated";
const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    app_metadata: AppMetadata,
}

/// Server-controlled metadata on Supabase sessions; users cannot edit it.
#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    role: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl AppMetadata {
    fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE) || self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}

#[derive(Debug, PartialEq)]
pub enum TokenRejection {
    /// Bad signature, expired, wrong audience or unreadable.
    Invalid(String),
    NotAdmin,
}

/// Checks Supabase session tokens (HS256, audience `authenticated`).
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SESSION_AUDIENCE]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Returns the admin's user id, or why the token was refused.
    pub fn verify_admin(&self, token: &str) -> Result<Uuid, TokenRejection> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|e| TokenRejection::Invalid(e.to_string()))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| TokenRejection::Invalid(format!("Invalid UUID: {}", e)))?;

        if !data.claims.app_metadata.is_admin() {
            return Err(TokenRejection::NotAdmin);
        }
        Ok(user_id)
    }
}

/// Caller holding a verified session whose app metadata grants the admin role.
#[derive(Debug)]
pub struct AdminUser {
    pub user_id: Uuid,
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<AdminUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(verifier) = req.app_data::<web::Data<JwtVerifier>>() else {
            error!("JwtVerifier missing from app data");
            return ready(Err(ErrorInternalServerError("Authentication not configured")));
        };

        let auth_header = match req.headers().get("Authorization") {
            Some(header) => match header.to_str() {
                Ok(h) => h,
                Err(_) => return ready(Err(ErrorUnauthorized("Invalid header format"))),
            },
            None => return ready(Err(ErrorUnauthorized("Missing Authorization header"))),
        };

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return ready(Err(ErrorUnauthorized("Invalid auth header format")));
        };

        match verifier.verify_admin(token.trim()) {
            Ok(user_id) => {
                debug!("Admin request from {}", user_id);
                ready(Ok(AdminUser { user_id }))
            }
            Err(TokenRejection::NotAdmin) => {
                warn!("Rejected non-admin session");
                ready(Err(ErrorForbidden("Admin role required")))
            }
            Err(TokenRejection::Invalid(reason)) => {
                warn!("Rejected bearer token: {}", reason);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}
