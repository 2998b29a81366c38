use std::env;
use anyhow::{Context, Result};

const DEFAULT_PORT: &str = "8080";
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub service_role_key: String,
    pub anon_key: Option<String>,
    /// HS256 secret Supabase signs session tokens with.
    pub jwt_secret: String,
    pub port: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL not set")?
            .trim()
            .to_string();
        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .context("SUPABASE_SERVICE_ROLE_KEY not set")?
            .trim()
            .to_string();
        let jwt_secret = env::var("SUPABASE_JWT_SECRET")
            .context("SUPABASE_JWT_SECRET not set")?
            .trim()
            .to_string();
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let origins = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.into());

        Ok(Self {
            supabase_url,
            service_role_key,
            anon_key,
            jwt_secret,
            port,
            allowed_origins: parse_origins(&origins),
        })
    }

    /// PostgREST base, e.g. `https://xyz.supabase.co/rest/v1`
    pub fn rest_url(&self) -> String {
        let base = self.supabase_url.trim_end_matches('/');
        if base.ends_with("/rest/v1") {
            base.to_string()
        } else {
            format!("{}/rest/v1", base)
        }
    }

    /// Key sent in the `apikey` header; the service key doubles for it when no anon key is set.
    pub fn api_key(&self) -> &str {
        self.anon_key.as_deref().unwrap_or(&self.service_role_key)
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn mask_key(k: &str) -> String {
    let chars: Vec<char> = k.chars().collect();
    if chars.len() <= 8 { return "[REDACTED]".to_string(); }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
