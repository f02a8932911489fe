// Frontend assets. At startup the prebuilt bundle is copied into the local
// serving directory (replacing whatever was there), then that directory is
// mounted behind the API routes with an `index.html` fallback so client-side
// routes resolve to the single-page app.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StaticAssetError {
    #[error("frontend build not found at {0}; run `npm run build` first")]
    SourceMissing(PathBuf),
    #[error("copying frontend from {from} to {to} failed: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Replace `dest` wholesale with a copy of `source`.
pub fn sync_frontend(source: &Path, dest: &Path) -> Result<(), StaticAssetError> {
    if !source.is_dir() {
        return Err(StaticAssetError::SourceMissing(source.to_path_buf()));
    }

    let copy = || -> io::Result<()> {
        if dest.exists() {
            fs::remove_dir_all(dest)?;
        }
        copy_dir(source, dest)
    };

    copy().map_err(|source_err| StaticAssetError::Copy {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: source_err,
    })
}

fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Run the startup copy on the blocking pool and report whether there is a
/// directory to serve afterwards. Failures are logged, never fatal.
pub async fn prepare(source: PathBuf, dest: PathBuf) -> Option<PathBuf> {
    let (from, to) = (source.clone(), dest.clone());
    match tokio::task::spawn_blocking(move || sync_frontend(&from, &to)).await {
        Ok(Ok(())) => info!(from = %source.display(), to = %dest.display(), "copied frontend build"),
        Ok(Err(e @ StaticAssetError::SourceMissing(_))) => warn!("{}", e),
        Ok(Err(e)) => error!("{}", e),
        Err(e) => error!("frontend copy task failed: {}", e),
    }

    if dest.is_dir() {
        Some(dest)
    } else {
        warn!(dir = %dest.display(), "static directory does not exist; frontend will not be served");
        None
    }
}

/// Service for every non-API path: files under `root`, `index.html` for
/// directories, and `root/index.html` for anything that does not exist.
pub fn service(root: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(root).fallback(ServeFile::new(root.join("index.html")))
}
