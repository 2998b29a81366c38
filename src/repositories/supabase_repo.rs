// src/repositories/supabase_repo.rs
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use urlencoding::encode;

use super::{ProfileSource, RepoError, ScheduleSource};
use crate::config::AppConfig;
use crate::models::profile::RawProfile;
use crate::models::scheduled_class::STATUS_SCHEDULED;
use crate::models::{Assignment, Profile, ScheduledClass};

const ADMIN_PROFILES_RPC: &str = "get_user_profiles_for_admin";

/// PostgREST access to the admin tables, authenticated with the service role key.
#[derive(Clone)]
pub struct SupabaseRepo {
    client: Client,
    base_rest_url: String,
    headers: HeaderMap,
}

impl SupabaseRepo {
    pub fn new(config: &AppConfig, client: Client) -> Result<Self, RepoError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("apikey", HeaderValue::from_str(config.api_key())?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.service_role_key))?,
        );

        Ok(Self {
            client,
            base_rest_url: config.rest_url(),
            headers,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_rest_url.trim_end_matches('/'), table)
    }

    fn profiles_url(&self) -> String {
        format!(
            "{}?select=*,user_roles(roles(name))&order=created_at.desc",
            self.table_url("profiles")
        )
    }

    fn scheduled_classes_url(&self) -> String {
        format!(
            "{}?select=*,class_type:class_types(name,difficulty_level)&status=eq.{}&order=start_time.asc",
            self.table_url("scheduled_classes"),
            encode(STATUS_SCHEDULED)
        )
    }

    fn class_assignments_url(&self) -> String {
        format!("{}?select=*", self.table_url("class_assignments"))
    }

    fn rpc_url(&self, function: &str) -> String {
        self.table_url(&format!("rpc/{}", function))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RepoError> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Parses a PostgREST response, turning non-2xx into `RepoError::Supabase`.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, RepoError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(RepoError::Supabase(format!(
            "{} -> {}",
            status.as_u16(),
            error_message(&text)
        )));
    }
    Ok(serde_json::from_str(&text)?)
}

/// PostgREST puts the reason in `message`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("msg"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ProfileSource for SupabaseRepo {
    async fn fetch_admin_profiles(&self) -> Result<Option<Vec<Profile>>, RepoError> {
        let url = self.rpc_url(ADMIN_PROFILES_RPC);
        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(&serde_json::json!({}))
            .send()
            .await?;

        read_json(resp).await
    }

    async fn fetch_raw_profiles(&self) -> Result<Vec<RawProfile>, RepoError> {
        let rows: Option<Vec<RawProfile>> = self.get_json(&self.profiles_url()).await?;
        Ok(rows.unwrap_or_default())
    }
}

#[async_trait]
impl ScheduleSource for SupabaseRepo {
    async fn fetch_scheduled_classes(&self) -> Result<Vec<ScheduledClass>, RepoError> {
        let rows: Option<Vec<ScheduledClass>> = self.get_json(&self.scheduled_classes_url()).await?;
        Ok(rows.unwrap_or_default())
    }

    async fn fetch_class_assignments(&self) -> Result<Vec<Assignment>, RepoError> {
        let rows: Option<Vec<Assignment>> = self.get_json(&self.class_assignments_url()).await?;
        Ok(rows.unwrap_or_default())
    }
}
