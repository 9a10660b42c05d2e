// Per-device session cookie store
//
// NX-OS hands back an `nxapi_auth` cookie after the first authenticated
// request; replaying it skips the AAA round-trip on every later call. The
// store is a flat `{name: value}` map, persisted as JSON next to other
// devices' stores so short-lived CLI runs can reuse a session.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

/// What the session does with cookies the device sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookiePolicy {
    /// Replay cookies and write them to disk whenever they change.
    #[default]
    Persist,
    /// Replay cookies for the lifetime of the session only.
    Memory,
    /// Never send or record cookies.
    Off,
}

impl CookiePolicy {
    pub fn sends_cookies(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Cookie file name for a management address: `<addr>.cookies`.
///
/// Colons in IPv6 literals are replaced so the name is valid everywhere.
pub fn cookie_file_name(address: &str) -> String {
    format!("{}.cookies", address.replace(':', "_"))
}

#[derive(Debug, Clone)]
pub struct CookieStore {
    policy: CookiePolicy,
    path: PathBuf,
    cookies: BTreeMap<String, String>,
}

impl CookieStore {
    /// Open the store at `path`.
    ///
    /// Under [`CookiePolicy::Persist`] any existing file is read; a missing
    /// or unreadable file just leaves the store empty.
    pub fn open(path: impl Into<PathBuf>, policy: CookiePolicy) -> Self {
        let path = path.into();
        let cookies = if policy == CookiePolicy::Persist {
            load(&path)
        } else {
            BTreeMap::new()
        };
        Self {
            policy,
            path,
            cookies,
        }
    }

    pub fn policy(&self) -> CookiePolicy {
        self.policy
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// `Cookie` header value (`a=1; b=2`), or `None` when there is nothing
    /// to send.
    pub fn header_value(&self) -> Option<String> {
        if !self.policy.sends_cookies() || self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Adopt the cookies from a response.
    ///
    /// The store is replaced only when the response carried cookies and they
    /// differ from what is held; an empty set never clears a live session.
    /// Returns `true` when the store changed.
    pub fn replace_if_changed(&mut self, incoming: BTreeMap<String, String>) -> bool {
        if !self.policy.sends_cookies() || incoming.is_empty() || incoming == self.cookies {
            return false;
        }
        debug!(count = incoming.len(), "session cookies changed");
        self.cookies = incoming;
        if self.policy == CookiePolicy::Persist {
            if let Err(e) = self.save() {
                warn!(path = %self.path.display(), error = %e, "failed to persist cookies");
            }
        }
        true
    }

    /// Write the store to disk, replacing the file atomically.
    ///
    /// The file is created `0600` on unix.
    pub fn save(&self) -> Result<(), Error> {
        let io_err = |source| Error::Io {
            path: self.path.display().to_string(),
            source,
        };
        let body = serde_json::to_vec(&self.cookies).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })?;

        let tmp = self.path.with_extension("cookies.tmp");
        let mut file = private_file(&tmp).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

fn load(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read cookie file, ignoring");
            return BTreeMap::new();
        }
    };
    match serde_json::from_slice(&raw) {
        Ok(cookies) => cookies,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt cookie file, ignoring");
            BTreeMap::new()
        }
    }
}

#[cfg(unix)]
fn private_file(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn private_file(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
