//! File-backed session store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::device::{generate_device_id, is_valid_device_id};
use crate::model::User;
use crate::Result;

/// Persisted session contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Session store persisted as JSON at a fixed path.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
}

impl SessionStore {
    /// Open the store, starting empty when the file does not exist.
    ///
    /// A corrupt file is discarded with a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                    SessionState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, state })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current persisted state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Write the state to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.state)?)?;

        // The file holds the bearer token: owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// The device id, generating and persisting one on first use.
    pub fn device_id(&mut self) -> Result<String> {
        if let Some(id) = self.state.device_id.as_ref().filter(|id| is_valid_device_id(id)) {
            debug!(device_id = %id, "Reusing existing device id");
            return Ok(id.clone());
        }
        let id = generate_device_id();
        info!(device_id = %id, "Generated new device id");
        self.state.device_id = Some(id.clone());
        self.save()?;
        Ok(id)
    }

    /// Record a successful login.
    pub fn set_login(&mut self, user: User, token: impl Into<String>) -> Result<()> {
        self.state.user = Some(user);
        self.state.token = Some(token.into());
        self.save()
    }

    /// Forget the login but keep the device id.
    ///
    /// Used when the backend rejects the token.
    pub fn clear_login(&mut self) -> Result<()> {
        self.state.user = None;
        self.state.token = None;
        self.save()
    }

    /// Forget everything, including the device id.
    pub fn clear_all(&mut self) -> Result<()> {
        self.state = SessionState::default();
        self.save()
    }

    /// Whether both a token and a user are stored.
    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some() && self.state.user.is_some()
    }

    /// The logged-in user.
    pub fn current_user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    /// The bearer token.
    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }
}
