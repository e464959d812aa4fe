use crate::errors::AppError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// The on-disk store: one JSON object mapping storage key to record value,
/// mirroring the browser key-value store the dashboard originally lived in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreData {
    pub entries: BTreeMap<String, Value>,
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

pub async fn load_data(path: &Path) -> StoreData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                StoreData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            StoreData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Reads one typed record. A record that is missing, or present but not of the
/// expected shape, is treated as absent so a corrupt entry never takes the
/// dashboard down.
pub fn get_record<T: DeserializeOwned>(data: &StoreData, key: &str) -> Option<T> {
    let value = data.entries.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("record under '{key}' has an unexpected shape, treating as absent: {err}");
            None
        }
    }
}

pub fn put_record<T: Serialize>(
    data: &mut StoreData,
    key: &str,
    record: &T,
) -> Result<(), AppError> {
    let value = serde_json::to_value(record).map_err(AppError::internal)?;
    data.entries.insert(key.to_string(), value);
    Ok(())
}

pub fn remove_record(data: &mut StoreData, key: &str) {
    data.entries.remove(key);
}
