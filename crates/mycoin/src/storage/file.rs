//! File backed storage
//!
//! One JSON blob per key inside a directory. Used by the CLI for both the
//! session slot (staged wallet, bounded by its ttl) and the persistent wallet mirror.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mycoin_common::database::{validate_storage_key, Error, SessionStorage};

/// Directory of key files
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create new [`FileStorage`] rooted at `dir`, creating the directory
    pub async fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Database(Box::new(e)))?;
        Ok(Self { dir })
    }

    /// Directory holding the key files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        validate_storage_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Database(Box::new(e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Error::Database(Box::new(e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::Database(Box::new(e)))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Database(Box::new(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session")).await.unwrap();

        assert_eq!(storage.get("temp_wallet_data").await.unwrap(), None);

        storage.set("temp_wallet_data", "{\"a\":1}").await.unwrap();
        assert_eq!(
            storage.get("temp_wallet_data").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(storage.dir().join("temp_wallet_data.json").exists());

        storage.remove("temp_wallet_data").await.unwrap();
        storage.remove("temp_wallet_data").await.unwrap();
        assert_eq!(storage.get("temp_wallet_data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            storage.get("../wallet").await,
            Err(Error::InvalidKey(_))
        ));
    }
}
