use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashboard_core::SelectedFile;
use thiserror::Error;

const CSV_MEDIA_TYPE: &str = "text/csv";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("cannot read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),
}

/// Reads `path` into memory as the file to upload.
///
/// The service only accepts CSV; other files are still loaded so the service
/// can report the rejection itself.
pub fn load_selected_file(path: &Path) -> Result<SelectedFile, SelectionError> {
    let read_err = |source| SelectionError::Read {
        path: path.to_path_buf(),
        source,
    };
    let meta = fs::metadata(path).map_err(read_err)?;
    if !meta.is_file() {
        return Err(SelectionError::NotAFile(path.to_path_buf()));
    }
    let content = fs::read(path).map_err(read_err)?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, media_type_for(path), content))
}

fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => CSV_MEDIA_TYPE,
        _ => FALLBACK_MEDIA_TYPE,
    }
}
