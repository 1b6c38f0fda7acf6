use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::backend::ClinicBackend;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ClinicBackend>,
    pub page_size: usize,
}

/* -------------------------
   Identifiers
--------------------------*/

/// Backend identifier. The backend mixes integer and string ids, so both
/// are accepted and written back in the form they arrived. Comparison and
/// hashing go by the text form: `9` and `"9"` are the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(RawId);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Int(i64),
    UInt(u64),
}

impl EntityId {
    pub fn key(&self) -> Cow<'_, str> {
        match &self.0 {
            RawId::Str(s) => Cow::Borrowed(s),
            RawId::Int(n) => Cow::Owned(n.to_string()),
            RawId::UInt(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(RawId::Str(s.to_string()))
    }
}

/* -------------------------
   Backend entities
--------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: EntityId,
    pub booking_status: BookingStatus,
    #[serde(default)]
    pub transfer_letter: Option<String>,
    pub appointment_date: String,
    /// Foreign references may be null; a null one never resolves.
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub center_id: Option<EntityId>,
    #[serde(default)]
    pub service_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: EntityId,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub center_id: Option<EntityId>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub service_id: EntityId,
    pub service_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub center_id: Option<EntityId>,
}

/// Clinic record. Only the ownership fields are typed; everything else
/// the backend sends is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Center {
    pub center_id: EntityId,
    /// Owner. Null for clinics nobody has claimed.
    #[serde(default)]
    pub user: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub center_id: Option<EntityId>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/* -------------------------
   Helpers
--------------------------*/

/// Ids of the centers owned by `user_id`.
pub fn owned_center_ids<'a>(centers: &'a [Center], user_id: &EntityId) -> Vec<&'a EntityId> {
    centers
        .iter()
        .filter(|c| c.user.as_ref() == Some(user_id))
        .map(|c| &c.center_id)
        .collect()
}
