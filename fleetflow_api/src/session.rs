//! Session token storage and the login redirect seam.
//!
//! The bearer token is process-wide state with a single writer: only the
//! login, logout and session-expiry paths call [`TokenStore::save`] or
//! [`TokenStore::clear`]. Everything else reads it at request time through
//! [`TokenStore::load`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Route the client navigates to when the server reports the session invalid.
pub const LOGIN_ROUTE: &str = "/login";

/// Durable storage for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when nobody is logged in.
    fn load(&self) -> Option<String>;
    /// Replaces the stored token.
    fn save(&self, token: &str) -> io::Result<()>;
    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> io::Result<()>;
}

/// Receives forced navigations issued by the client (session expiry).
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// In-process token store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Token store backed by a single file, so a login survives between runs.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // `mode` only applies on creation; tighten a file left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Default navigator: there is no router outside a UI, so the redirect is
/// reported through the log.
#[derive(Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::warn!("Session expired, navigating to {}", route);
    }
}
