// ── Session persistence ──
//
// A login outlives the process that performed it. The bearer token lives
// in the system keyring (or `EVENTHUB_TOKEN`); the non-secret identity
// fields live in `session.toml`, keyed by profile name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use eventhub_core::{AuthContext, RecordId, Role};

use crate::{ConfigError, data_dir};

const KEYRING_SERVICE: &str = "eventhub";

/// Environment variable that supplies the bearer token, bypassing the
/// keyring.
pub const TOKEN_ENV: &str = "EVENTHUB_TOKEN";

/// Default location of the session file.
pub fn session_path() -> PathBuf {
    data_dir().join("session.toml")
}

/// Identity fields of a login, without the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: RecordId,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl StoredSession {
    pub fn from_context(ctx: &AuthContext) -> Self {
        Self {
            user_id: ctx.user_id.clone(),
            display_name: ctx.display_name.clone(),
            email: ctx.email.clone(),
            role: ctx.role,
        }
    }

    pub fn into_context(self, token: SecretString) -> AuthContext {
        AuthContext {
            token,
            user_id: self.user_id,
            display_name: self.display_name,
            email: self.email,
            role: self.role,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    sessions: HashMap<String, StoredSession>,
}

/// Session storage for one profile.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    profile: String,
}

impl SessionStore {
    pub fn new(profile: &str) -> Self {
        Self::at(session_path(), profile)
    }

    pub fn at(path: PathBuf, profile: &str) -> Self {
        Self {
            path,
            profile: profile.to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    // ── Identity file ────────────────────────────────────────────────

    fn read_file(&self) -> Result<SessionFile, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_file(&self, file: &SessionFile) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(file)?)?;
        Ok(())
    }

    /// Stored identity for this profile, if any.
    pub fn read(&self) -> Result<Option<StoredSession>, ConfigError> {
        Ok(self.read_file()?.sessions.remove(&self.profile))
    }

    pub fn write(&self, session: &StoredSession) -> Result<(), ConfigError> {
        let mut file = self.read_file()?;
        file.sessions.insert(self.profile.clone(), session.clone());
        self.write_file(&file)
    }

    /// Drop this profile's identity. Returns whether one was stored.
    pub fn remove(&self) -> Result<bool, ConfigError> {
        let mut file = self.read_file()?;
        let existed = file.sessions.remove(&self.profile).is_some();
        if existed {
            self.write_file(&file)?;
        }
        Ok(existed)
    }

    // ── Full session ─────────────────────────────────────────────────

    /// Restore the session with the token from the environment or keyring.
    pub fn load(&self) -> Result<Option<AuthContext>, ConfigError> {
        self.load_with(self.token())
    }

    /// Restore the session with an explicitly supplied token.
    pub fn load_with(&self, token: Option<SecretString>) -> Result<Option<AuthContext>, ConfigError> {
        let Some(stored) = self.read()? else {
            return Ok(None);
        };
        Ok(token.map(|token| stored.into_context(token)))
    }

    /// Persist a fresh login: token to the keyring, identity to the file.
    pub fn save(&self, ctx: &AuthContext) -> Result<(), ConfigError> {
        self.keyring_entry()?
            .set_password(ctx.token.expose_secret())
            .map_err(|e| ConfigError::Keyring(e.to_string()))?;
        self.write(&StoredSession::from_context(ctx))
    }

    /// Forget the session. Returns whether anything was stored.
    pub fn clear(&self) -> Result<bool, ConfigError> {
        let had_token = match self.keyring_entry()?.delete_credential() {
            Ok(()) => true,
            Err(keyring::Error::NoEntry) => false,
            Err(e) => return Err(ConfigError::Keyring(e.to_string())),
        };
        Ok(self.remove()? || had_token)
    }

    fn token(&self) -> Option<SecretString> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Some(SecretString::from(token));
            }
        }
        self.keyring_entry()
            .ok()?
            .get_password()
            .ok()
            .map(SecretString::from)
    }

    fn keyring_entry(&self) -> Result<keyring::Entry, ConfigError> {
        keyring::Entry::new(KEYRING_SERVICE, &format!("{}/token", self.profile))
            .map_err(|e| ConfigError::Keyring(e.to_string()))
    }
}
