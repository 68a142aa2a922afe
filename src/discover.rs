//! Input file discovery.

use crate::ts::SourceLang;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
#[error("failed to walk {}: {source}", path.display())]
pub struct DiscoverError {
    pub path: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Every regular file under `root` handled by one of `languages`, in
/// lexical walk order. A `root` that is itself a matching file is returned
/// on its own. Any walk error aborts discovery.
pub fn discover_files(
    root: &Path,
    languages: &[SourceLang],
) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoverError {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if entry.file_type().is_file()
            && SourceLang::from_path(entry.path(), languages).is_some()
        {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "discovered input files");
    Ok(files)
}
