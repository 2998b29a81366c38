// src/models/profile.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_ROLE: &str = "user";
pub const INSTRUCTOR_ROLE: &str = "instructor";

/// Admin view of one user, as produced by `get_user_profiles_for_admin`
/// or by transforming a [`RawProfile`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "AdminProfileRow")]
pub struct Profile {
    pub id: String,
    /// Join target for `scheduled_classes.instructor_id`.
    pub user_id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub experience_level: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub email: Option<String>,
    pub user_created_at: Option<String>,
    pub user_roles: Vec<String>,
    // Not computed on this path yet
    pub total_bookings: u32,
    pub attended_classes: u32,
    pub articles_viewed: u32,
    /// Columns not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Row of the admin view. Taken as-is apart from the invariants:
/// a missing `user_id` reads as `id`, null counters as 0, roles never empty.
#[derive(Deserialize)]
struct AdminProfileRow {
    id: String,
    user_id: Option<String>,
    full_name: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
    experience_level: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    email: Option<String>,
    user_created_at: Option<String>,
    #[serde(default = "default_roles", deserialize_with = "deserialize_roles")]
    user_roles: Vec<String>,
    total_bookings: Option<u32>,
    attended_classes: Option<u32>,
    articles_viewed: Option<u32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<AdminProfileRow> for Profile {
    fn from(row: AdminProfileRow) -> Self {
        Profile {
            user_id: user_id_or_record_id(row.user_id, &row.id),
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            bio: row.bio,
            experience_level: row.experience_level,
            created_at: row.created_at,
            updated_at: row.updated_at,
            email: row.email,
            user_created_at: row.user_created_at,
            user_roles: row.user_roles,
            total_bookings: row.total_bookings.unwrap_or(0),
            attended_classes: row.attended_classes.unwrap_or(0),
            articles_viewed: row.articles_viewed.unwrap_or(0),
            extra: row.extra,
        }
    }
}

impl Profile {
    pub fn has_role(&self, role: &str) -> bool {
        self.user_roles.iter().any(|r| r == role)
    }

    pub fn is_instructor(&self) -> bool {
        self.has_role(INSTRUCTOR_ROLE)
    }
}

/// Row of `profiles?select=*,user_roles(roles(name))`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProfile {
    pub id: String,
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub email: Option<String>,
    pub user_roles: Option<Vec<RawUserRole>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawUserRole {
    pub roles: Option<RoleRef>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RoleRef {
    pub name: Option<String>,
}

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        let role_names = raw
            .user_roles
            .unwrap_or_default()
            .into_iter()
            .filter_map(|ur| ur.roles.and_then(|r| r.name));

        Profile {
            user_id: user_id_or_record_id(raw.user_id, &raw.id),
            id: raw.id,
            full_name: raw.full_name,
            phone: raw.phone,
            bio: raw.bio,
            experience_level: Some(
                raw.role
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            ),
            user_created_at: raw.created_at.clone(),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            email: raw.email,
            user_roles: normalize_roles(role_names),
            total_bookings: 0,
            attended_classes: 0,
            articles_viewed: 0,
            extra: raw.extra,
        }
    }
}

fn user_id_or_record_id(user_id: Option<String>, id: &str) -> String {
    user_id.filter(|u| !u.is_empty()).unwrap_or_else(|| id.to_string())
}

/// Trims, drops blanks and duplicates; an empty result becomes `["user"]`.
pub fn normalize_roles<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut roles: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !roles.iter().any(|r| r == name) {
            roles.push(name.to_string());
        }
    }
    if roles.is_empty() {
        return default_roles();
    }
    roles
}

fn default_roles() -> Vec<String> {
    vec![DEFAULT_ROLE.to_string()]
}

fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(normalize_roles(raw.unwrap_or_default().into_iter().flatten()))
}
