use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

pub async fn read_json_config<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: DeserializeOwned + ?Sized,
{
    let path = path.as_ref();

    let string = tokio::fs::read_to_string(path).await.map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let body: T = serde_json::from_str(&string).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Config {} has been read successfully", path.to_string_lossy());

    Ok(body)
}

pub async fn write_json_config<T>(data: &T, path: impl AsRef<Path>) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    // The foreign schemas we touch are pretty-printed by their owners.
    let body = serde_json::to_string_pretty(data).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;

    write_to_file(body.as_bytes(), path).await?;

    tracing::info!("Config {} has been written successfully", path.to_string_lossy());

    Ok(())
}

pub fn read_json_config_sync<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: DeserializeOwned + ?Sized,
{
    let runtime = current_thread_runtime()?;
    runtime.block_on(read_json_config::<T>(path))
}

pub fn write_json_config_sync<T>(data: &T, path: impl AsRef<Path>) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let runtime = current_thread_runtime()?;
    runtime.block_on(write_json_config::<T>(data, path))
}

pub async fn write_to_file(data: &[u8], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
    }
    let mut file = tokio::fs::File::create(&path).await.map_err(write_error)?;

    file.write_all(data).await.map_err(write_error)?;

    Ok(())
}

fn current_thread_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(Error::Runtime)
}
