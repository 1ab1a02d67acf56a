// ── Signed-in session ──
//
// Populated at login, cleared at logout, read-only everywhere else. The
// `Hub` owns the current context; nothing reads it from ambient state.

use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::RecordId;

/// Account role as reported by the auth service.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Organizer,
    Admin,
}

impl Role {
    /// Parse a backend role string. Missing or unknown roles fall back to
    /// `User`, matching how the auth service defaults new accounts.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(|r| Self::from_str(r.trim()).ok())
            .unwrap_or_default()
    }

    /// Organizers and admins manage events and check tickets in.
    pub fn is_organizer(self) -> bool {
        matches!(self, Self::Organizer | Self::Admin)
    }
}

/// Explicit session state handed to everything that needs the caller's
/// identity.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token: SecretString,
    pub user_id: RecordId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}
