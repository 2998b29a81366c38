// In-memory data sources for service and handler tests.
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use crate::models::{Assignment, Profile, RawProfile, ScheduledClass};
use crate::repositories::{ProfileSource, RepoError, ScheduleSource};

pub fn profile(user_id: &str, full_name: &str, roles: &[&str]) -> Profile {
    serde_json::from_value(json!({
        "id": format!("p-{}", user_id),
        "user_id": user_id,
        "full_name": full_name,
        "user_roles": roles,
    }))
    .unwrap()
}

pub fn raw_profile(id: &str, full_name: &str, roles: &[&str]) -> RawProfile {
    let user_roles: Vec<_> = roles.iter().map(|r| json!({ "roles": { "name": r } })).collect();
    serde_json::from_value(json!({
        "id": id,
        "full_name": full_name,
        "user_roles": user_roles,
    }))
    .unwrap()
}

pub fn class(id: &str, instructor_id: &str) -> ScheduledClass {
    serde_json::from_value(json!({
        "id": id,
        "instructor_id": instructor_id,
        "status": "scheduled",
        "start_time": "2024-05-01T09:00:00+00:00",
        "class_type": { "name": "Vinyasa", "difficulty_level": "beginner" },
    }))
    .unwrap()
}

pub fn assignment(id: &str, scheduled_class_id: &str) -> Assignment {
    serde_json::from_value(json!({ "id": id, "scheduled_class_id": scheduled_class_id })).unwrap()
}

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-bytes";

pub fn sign_token(secret: &str, claims: &serde_json::Value) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

fn admin_claims(sub: &str) -> serde_json::Value {
    json!({
        "sub": sub,
        "aud": "authenticated",
        "role": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
        "app_metadata": { "role": "admin" },
    })
}

/// Admin session signed with [`TEST_JWT_SECRET`].
pub fn token_for(sub: &str) -> String {
    sign_token(TEST_JWT_SECRET, &admin_claims(sub))
}

/// Same claims as [`token_for`] with the signature replaced by junk.
pub fn unsigned_token_for(sub: &str) -> String {
    let signed = token_for(sub);
    let (head, _) = signed.rsplit_once('.').unwrap();
    format!("{}.signature", head)
}

fn supabase_err(message: &str) -> RepoError {
    RepoError::Supabase(message.to_string())
}

/// What the aggregate RPC answers with.
pub enum AdminReply {
    Profiles(Vec<Profile>),
    Null,
    Fail(&'static str),
}

pub struct StubProfileSource {
    pub admin: Mutex<AdminReply>,
    pub raw: Mutex<Result<Vec<RawProfile>, &'static str>>,
    pub admin_calls: AtomicUsize,
    pub raw_calls: AtomicUsize,
}

impl StubProfileSource {
    pub fn new(admin: AdminReply, raw: Result<Vec<RawProfile>, &'static str>) -> Self {
        Self {
            admin: Mutex::new(admin),
            raw: Mutex::new(raw),
            admin_calls: AtomicUsize::new(0),
            raw_calls: AtomicUsize::new(0),
        }
    }

    pub fn raw_calls(&self) -> usize {
        self.raw_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for StubProfileSource {
    async fn fetch_admin_profiles(&self) -> Result<Option<Vec<Profile>>, RepoError> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.admin.lock().unwrap() {
            AdminReply::Profiles(p) => Ok(Some(p.clone())),
            AdminReply::Null => Ok(None),
            AdminReply::Fail(msg) => Err(supabase_err(msg)),
        }
    }

    async fn fetch_raw_profiles(&self) -> Result<Vec<RawProfile>, RepoError> {
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        self.raw.lock().unwrap().clone().map_err(supabase_err)
    }
}

pub struct StubScheduleSource {
    pub classes: Mutex<Result<Vec<ScheduledClass>, &'static str>>,
    pub assignments: Mutex<Result<Vec<Assignment>, &'static str>>,
}

impl StubScheduleSource {
    pub fn new(
        classes: Result<Vec<ScheduledClass>, &'static str>,
        assignments: Result<Vec<Assignment>, &'static str>,
    ) -> Self {
        Self {
            classes: Mutex::new(classes),
            assignments: Mutex::new(assignments),
        }
    }
}

#[async_trait]
impl ScheduleSource for StubScheduleSource {
    async fn fetch_scheduled_classes(&self) -> Result<Vec<ScheduledClass>, RepoError> {
        self.classes.lock().unwrap().clone().map_err(supabase_err)
    }

    async fn fetch_class_assignments(&self) -> Result<Vec<Assignment>, RepoError> {
        self.assignments.lock().unwrap().clone().map_err(supabase_err)
    }
}

/// Class fetches block until the test releases them, one gate per call in order.
/// Each call reports on `entered` once it is waiting.
pub struct GatedScheduleSource {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<ScheduledClass>>>>,
    entered: mpsc::UnboundedSender<()>,
    assignments: Vec<Assignment>,
}

impl GatedScheduleSource {
    pub fn new(
        gates: Vec<oneshot::Receiver<Vec<ScheduledClass>>>,
        assignments: Vec<Assignment>,
    ) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (entered, entered_rx) = mpsc::unbounded_channel();
        let source = Self {
            gates: Mutex::new(gates.into_iter().collect()),
            entered,
            assignments,
        };
        (source, entered_rx)
    }
}

#[async_trait]
impl ScheduleSource for GatedScheduleSource {
    async fn fetch_scheduled_classes(&self) -> Result<Vec<ScheduledClass>, RepoError> {
        let gate = self.gates.lock().unwrap().pop_front();
        let _ = self.entered.send(());
        match gate {
            Some(rx) => rx.await.map_err(|_| supabase_err("gate dropped")),
            None => Err(supabase_err("no gate left")),
        }
    }

    async fn fetch_class_assignments(&self) -> Result<Vec<Assignment>, RepoError> {
        Ok(self.assignments.clone())
    }
}

/// Profile source whose admin view always fails, after optionally waiting on a gate,
/// and whose raw reads block on one gate per call. Reports `"admin"` / `"raw"` on
/// `entered` as each call starts waiting.
pub struct GatedProfileSource {
    admin_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    raw_gates: Mutex<VecDeque<oneshot::Receiver<Vec<RawProfile>>>>,
    entered: mpsc::UnboundedSender<&'static str>,
}

impl GatedProfileSource {
    pub fn new(
        admin_gates: Vec<oneshot::Receiver<()>>,
        raw_gates: Vec<oneshot::Receiver<Vec<RawProfile>>>,
    ) -> (Self, mpsc::UnboundedReceiver<&'static str>) {
        let (entered, entered_rx) = mpsc::unbounded_channel();
        let source = Self {
            admin_gates: Mutex::new(admin_gates.into_iter().collect()),
            raw_gates: Mutex::new(raw_gates.into_iter().collect()),
            entered,
        };
        (source, entered_rx)
    }
}

#[async_trait]
impl ProfileSource for GatedProfileSource {
    async fn fetch_admin_profiles(&self) -> Result<Option<Vec<Profile>>, RepoError> {
        let gate = self.admin_gates.lock().unwrap().pop_front();
        let _ = self.entered.send("admin");
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        Err(supabase_err("function get_user_profiles_for_admin does not exist"))
    }

    async fn fetch_raw_profiles(&self) -> Result<Vec<RawProfile>, RepoError> {
        let gate = self.raw_gates.lock().unwrap().pop_front();
        let _ = self.entered.send("raw");
        match gate {
            Some(rx) => rx.await.map_err(|_| supabase_err("gate dropped")),
            None => Err(supabase_err("no gate left")),
        }
    }
}
