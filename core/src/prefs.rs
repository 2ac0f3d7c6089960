//! File-backed store for the signed-in identity.
//!
//! The three identity fields live in `<dir>/user_preferences.json` under the
//! keys `user_name`, `user_email` and `user_photo_url`. Writes go to a temp
//! file that is renamed over the store so readers never see half a record.
//! The current value is also published on a watch channel.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::watch;

use crate::error::StorageError;
use crate::types::Identity;

pub const STORE_NAME: &str = "user_preferences";

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    identity: watch::Sender<Identity>,
}

impl PreferenceStore {
    /// Open the store in `dir`, loading whatever identity is already saved.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let path = dir.as_ref().join(format!("{STORE_NAME}.json"));
        let identity = read_identity(&path)?;
        let (tx, _) = watch::channel(identity);
        Ok(Self { path, identity: tx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot.
    pub fn identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    /// Receiver that observes every later save and clear.
    pub fn subscribe(&self) -> watch::Receiver<Identity> {
        self.identity.subscribe()
    }

    pub fn save(&self, identity: &Identity) -> Result<(), StorageError> {
        write_identity(&self.path, identity)?;
        tracing::info!(email = %identity.email, "identity saved");
        self.identity.send_replace(identity.clone());
        Ok(())
    }

    /// Reset all three fields to empty.
    pub fn clear(&self) -> Result<(), StorageError> {
        write_identity(&self.path, &Identity::default())?;
        tracing::info!("identity cleared");
        self.identity.send_replace(Identity::default());
        Ok(())
    }
}

fn read_identity(path: &Path) -> Result<Identity, StorageError> {
    if !path.exists() {
        return Ok(Identity::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Identity::default());
    }
    Ok(serde_json::from_str(&content)?)
}

fn write_identity(path: &Path, identity: &Identity) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(identity)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
