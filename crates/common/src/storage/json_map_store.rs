use std::{collections::HashMap, hash::Hash, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::CoreError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a single JSON file. Every mutation rewrites
/// the whole file through a temp file + rename, so readers never observe a
/// half-written map.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`. A missing file is created empty; a corrupt one
    /// is treated as empty and overwritten on the next mutation.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, CoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "corrupt json store, starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                write_atomic(&file_path, &serde_json::to_vec(&empty).map_err(|e| CoreError::Parse(e.to_string()))?).await?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), CoreError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| CoreError::Parse(e.to_string()))?;
        drop(map);
        write_atomic(&self.file_path, &data).await
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), CoreError> {
        let mut map = self.inner.write().await;
        map.insert(key, value);
        drop(map);
        self.save().await
    }
}

/// Write `data` next to `path` and rename it into place.
pub async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await.map_err(|e| CoreError::Io(e.to_string()))?;
    fs::rename(&tmp, path).await.map_err(|e| CoreError::Io(e.to_string()))?;
    Ok(())
}
