//! Session storage port: one bearer token and one cached user.
//!
//! Every token read and write in the client goes through a [`SessionStore`],
//! so a refresh swaps the token in exactly one place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nanro_core::User;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn token(&self) -> ApiResult<Option<String>>;
    async fn set_token(&self, token: &str) -> ApiResult<()>;
    async fn remove_token(&self) -> ApiResult<()>;
    async fn user(&self) -> ApiResult<Option<User>>;
    async fn set_user(&self, user: &User) -> ApiResult<()>;
    async fn remove_user(&self) -> ApiResult<()>;

    /// Drop token and cached user together.
    async fn clear(&self) -> ApiResult<()> {
        self.remove_token().await?;
        self.remove_user().await
    }
}

/// Everything a session persists
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionData {
    pub token: Option<String>,
    pub user: Option<User>,
}

/// Process-local store, used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            data: Mutex::new(SessionData {
                token: Some(token.into()),
                user: None,
            }),
        }
    }

    pub fn snapshot(&self) -> SessionData {
        self.data.lock().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> ApiResult<Option<String>> {
        Ok(self.data.lock().token.clone())
    }

    async fn set_token(&self, token: &str) -> ApiResult<()> {
        self.data.lock().token = Some(token.to_string());
        Ok(())
    }

    async fn remove_token(&self) -> ApiResult<()> {
        self.data.lock().token = None;
        Ok(())
    }

    async fn user(&self) -> ApiResult<Option<User>> {
        Ok(self.data.lock().user.clone())
    }

    async fn set_user(&self, user: &User) -> ApiResult<()> {
        self.data.lock().user = Some(user.clone());
        Ok(())
    }

    async fn remove_user(&self) -> ApiResult<()> {
        self.data.lock().user = None;
        Ok(())
    }
}

/// JSON file store (`session.json`). A missing file is an empty session.
///
/// The file is rewritten whole on every change; an async mutex serialises
/// read-modify-write cycles so concurrent updates cannot interleave.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ApiResult<SessionData> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) if s.trim().is_empty() => Ok(SessionData::default()),
            Ok(s) => serde_json::from_str(&s)
                .map_err(|e| ApiError::Storage(format!("parse {}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionData::default()),
            Err(e) => Err(ApiError::Storage(format!("read {}: {e}", self.path.display()))),
        }
    }

    async fn save(&self, data: &SessionData) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let s = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.path, s)
            .await
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", self.path.display())))?;
        restrict_permissions(&self.path).await;
        Ok(())
    }

    async fn update(&self, f: impl FnOnce(&mut SessionData) + Send) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        f(&mut data);
        self.save(&data).await
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    if let Err(e) = tokio::fs::set_permissions(path, perms).await {
        tracing::warn!("could not restrict permissions on {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) {}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> ApiResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.token)
    }

    async fn set_token(&self, token: &str) -> ApiResult<()> {
        let token = token.to_string();
        self.update(move |d| d.token = Some(token)).await
    }

    async fn remove_token(&self) -> ApiResult<()> {
        self.update(|d| d.token = None).await
    }

    async fn user(&self) -> ApiResult<Option<User>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.user)
    }

    async fn set_user(&self, user: &User) -> ApiResult<()> {
        let user = user.clone();
        self.update(move |d| d.user = Some(user)).await
    }

    async fn remove_user(&self) -> ApiResult<()> {
        self.update(|d| d.user = None).await
    }

    async fn clear(&self) -> ApiResult<()> {
        self.update(|d| *d = SessionData::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-9".into(),
            email: Some("ada@example.com".into()),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn test_memory_store_clear() {
        let store = MemorySessionStore::with_token("abc");
        store.set_user(&user()).await.unwrap();
        assert_eq!(store.token().await.unwrap().as_deref(), Some("abc"));
        store.clear().await.unwrap();
        assert_eq!(store.snapshot(), SessionData::default());
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.token().await.unwrap(), None);
        assert_eq!(store.user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::new(&path);
        store.set_token("tok-1").await.unwrap();
        store.set_user(&user()).await.unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.token().await.unwrap().as_deref(), Some("tok-1"));
        assert_eq!(reopened.user().await.unwrap().unwrap().id, "u-9");

        reopened.clear().await.unwrap();
        assert_eq!(store.token().await.unwrap(), None);
        assert_eq!(store.user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSessionStore::new(&path);
        assert!(matches!(store.token().await, Err(ApiError::Storage(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStore::new(&path).set_token("t").await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
