//! Process-wide session token storage.
//!
//! The token is written once when activation completes and read by whatever
//! hydrates the auth context on the next load. Clearing is a sign-out concern
//! and is only exposed here so that callers have a single place to do it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use super::types::SessionToken;

pub trait SessionStore: Send + Sync {
    /// Persists `token`, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the token could not be persisted.
    fn set(&self, token: SessionToken) -> Result<()>;

    /// # Errors
    /// Returns an error if stored state exists but cannot be read.
    fn get(&self) -> Result<Option<SessionToken>>;

    /// # Errors
    /// Returns an error if stored state exists but cannot be removed.
    fn clear(&self) -> Result<()>;
}

/// In-memory store; survives for the life of the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set(&self, token: SessionToken) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    fn get(&self) -> Result<Option<SessionToken>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn clear(&self) -> Result<()> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// JSON file store that survives restarts of the process.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn set(&self, token: SessionToken) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_vec(&StoredSession {
            token: token.expose().to_string(),
        })
        .context("failed to encode session")?;

        let temp = self.temp_path();
        fs::write(&temp, contents)
            .with_context(|| format!("failed to write {}", temp.display()))?;
        restrict_permissions(&temp)?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), "session stored");
        Ok(())
    }

    fn get(&self) -> Result<Option<SessionToken>> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        let stored: StoredSession = serde_json::from_slice(&contents)
            .with_context(|| format!("invalid session file {}", self.path.display()))?;
        Ok(Some(SessionToken::new(stored.token)))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {}", self.path.display())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
