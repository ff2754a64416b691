use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::errors::AssistantError;

/// Credential storage. Injected so the backend is swappable; the default is
/// a JSON file per key under a configured directory.
pub trait SecretStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, AssistantError>;
    fn store(&self, key: &str, value: &str) -> Result<(), AssistantError>;
}

pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SecretStore for FileSecretStore {
    fn load(&self, key: &str) -> Result<Option<String>, AssistantError> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AssistantError::Auth(format!(
                "failed to read secret {key}: {e}"
            ))),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), AssistantError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AssistantError::Auth(format!("failed to create secrets dir: {e}")))?;
        fs::write(self.path(key), value)
            .map_err(|e| AssistantError::Auth(format!("failed to write secret {key}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_secret_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecretStore::new(dir.path());
        assert!(store.load("google-calendar").unwrap().is_none());
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSecretStore::new(dir.path().join("nested"));
        store.store("google-calendar", "{\"access_token\":\"t\"}").unwrap();
        assert_eq!(
            store.load("google-calendar").unwrap().as_deref(),
            Some("{\"access_token\":\"t\"}")
        );
    }
}
