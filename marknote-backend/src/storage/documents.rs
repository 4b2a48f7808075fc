//! Document blob storage
//!
//! Every uploaded file is written once under `<media_dir>/documents/` with a
//! random prefix, e.g. `documents/3f9a1c2e_meeting-notes.md`. Notes store the
//! path relative to the media dir.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::{defaults, documents_dir};

const MAX_STORED_NAME_LEN: usize = 100;
const FALLBACK_NAME: &str = "document.md";

/// Blob files under `<media_dir>/documents/`.
///
/// Clones share one lock: writes and single removals run under the shared
/// side, wiping the directory needs the exclusive side.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    media_dir: PathBuf,
    lock: Arc<RwLock<()>>,
}

/// Shared access; held across a write and the row that references it
pub struct SharedDocuments<'a> {
    store: &'a DocumentStore,
    _guard: RwLockReadGuard<'a, ()>,
}

/// Exclusive access; no save or remove runs while this is alive
pub struct ExclusiveDocuments<'a> {
    store: &'a DocumentStore,
    _guard: RwLockWriteGuard<'a, ()>,
}

impl DocumentStore {
    pub fn new(media_dir: PathBuf) -> Self {
        Self {
            media_dir,
            lock: Arc::new(RwLock::new(())),
        }
    }

    pub fn documents_dir(&self) -> PathBuf {
        documents_dir(&self.media_dir)
    }

    pub async fn shared(&self) -> SharedDocuments<'_> {
        SharedDocuments {
            store: self,
            _guard: self.lock.read().await,
        }
    }

    pub async fn exclusive(&self) -> ExclusiveDocuments<'_> {
        ExclusiveDocuments {
            store: self,
            _guard: self.lock.write().await,
        }
    }

    pub async fn read(&self, relative: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(relative)?).await
    }

    async fn write_file(&self, file_name: Option<&str>, data: &[u8]) -> io::Result<String> {
        let dir = self.documents_dir();
        fs::create_dir_all(&dir).await?;

        let prefix = uuid::Uuid::new_v4().simple().to_string();
        let stored_name = format!("{}_{}", &prefix[..8], sanitize_file_name(file_name));
        let path = dir.join(&stored_name);

        let temp_path = path.with_extension("upload-tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &path).await?;

        log::debug!("[DOCS] Stored {} ({} bytes)", stored_name, data.len());
        Ok(format!("{}/{}", defaults::DOCUMENTS_SUBDIR, stored_name))
    }

    async fn remove_file(&self, relative: &str) -> io::Result<bool> {
        match fs::remove_file(self.resolve(relative)?).await {
            Ok(()) => {
                log::debug!("[DOCS] Deleted {}", relative);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        let rel = Path::new(relative);
        let contained = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("document path escapes media directory: {}", relative),
            ));
        }
        Ok(self.media_dir.join(rel))
    }
}

impl SharedDocuments<'_> {
    /// Write an uploaded file, returning its path relative to the media dir
    pub async fn save(&self, file_name: Option<&str>, data: &[u8]) -> io::Result<String> {
        self.store.write_file(file_name, data).await
    }

    /// Remove a stored document. A file that is already gone is not an error;
    /// returns whether something was actually deleted.
    pub async fn remove(&self, relative: &str) -> io::Result<bool> {
        self.store.remove_file(relative).await
    }
}

impl ExclusiveDocuments<'_> {
    pub async fn remove(&self, relative: &str) -> io::Result<bool> {
        self.store.remove_file(relative).await
    }

    /// Remove the whole documents directory, including files no note references
    pub async fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(self.store.documents_dir()).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Reduce a client-supplied name to a safe single path segment
fn sanitize_file_name(file_name: Option<&str>) -> String {
    let base = file_name
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STORED_NAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
