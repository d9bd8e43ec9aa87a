// src/output.rs
// =============================================================================
// Writes the discovered subdomains to a plain text file, one per line.
//
// - Missing parent directories are created
// - An output path that is an existing directory is refused with an error
// =============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::scan::AggregateSet;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output path '{}' is a directory, please provide a file path", .0.display())]
    IsDirectory(PathBuf),

    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Saves every subdomain in the set to `path`
//
// Returns the number of lines written.
pub async fn save_subdomains(path: &Path, subdomains: &AggregateSet) -> Result<usize, OutputError> {
    if fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Err(OutputError::IsDirectory(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut contents = String::new();
    for subdomain in subdomains.iter() {
        contents.push_str(subdomain);
        contents.push('\n');
    }

    let mut file = fs::File::create(path).await.map_err(write_error)?;
    file.write_all(contents.as_bytes()).await.map_err(write_error)?;
    file.flush().await.map_err(write_error)?;

    tracing::info!(path = %path.display(), count = subdomains.len(), "subdomains saved");
    Ok(subdomains.len())
}
