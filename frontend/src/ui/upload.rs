//! Reading file-input selections from disk.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;

use crate::domain::FileUpload;

/// Failures while loading a file selected for upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The path does not name a file.
    #[error("upload path `{path}` must name a file")]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },
    /// The file or its directory could not be opened or read.
    #[error("failed to read upload `{path}`: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Load `path` as the selection of a file input.
pub fn load_upload(path: &Path) -> Result<FileUpload, UploadError> {
    let io_error = |source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| UploadError::NotAFile {
        path: path.to_path_buf(),
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    let mut file = directory.open(Path::new(file_name)).map_err(io_error)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_error)?;
    Ok(FileUpload::new(
        file_name.to_string_lossy(),
        content_type(path),
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use rstest::rstest;
    use tempfile::Builder;

    #[rstest]
    #[case("face.JPG", "image/jpeg")]
    #[case("face.png", "image/png")]
    #[case("notes", "application/octet-stream")]
    fn content_type_follows_extension(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_type(Path::new(name)), expected);
    }

    #[test]
    fn loads_bytes_and_name() {
        let mut file = Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("temp file");
        file.write_all(b"\x89PNG").expect("write");

        let upload = load_upload(file.path()).expect("upload loads");
        assert_eq!(upload.bytes, b"\x89PNG");
        assert_eq!(upload.content_type, "image/png");
        assert!(upload.file_name.ends_with(".png"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = load_upload(&dir.path().join("absent.png")).expect_err("missing");
        assert!(matches!(error, UploadError::Io { .. }));
        assert!(error.to_string().starts_with("failed to read upload"));
    }

    #[test]
    fn root_path_is_not_a_file() {
        let error = load_upload(Path::new("/")).expect_err("root has no file name");
        assert!(matches!(error, UploadError::NotAFile { .. }));
    }
}
