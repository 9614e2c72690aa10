use super::types::StackfileError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Reads the raw UTF-8 content of a Stackfile.
///
/// Absence of the file maps to [`StackfileError::NotFound`]; every other
/// failure, including the path naming a directory, maps to
/// [`StackfileError::Io`].
pub async fn load_stackfile(path: &Path) -> Result<String, StackfileError> {
    debug!(path = %path.display(), "Loading Stackfile");

    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => StackfileError::NotFound {
                path: path.to_path_buf(),
            },
            _ => StackfileError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".stack");
        let content = "version: \"0.1\"\ntechnologies: []\n";
        fs::write(&path, content).unwrap();

        assert_eq!(load_stackfile(&path).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing/.stack");

        let err = load_stackfile(&path).await.unwrap_err();
        match &err {
            StackfileError::NotFound { path: searched } => assert_eq!(searched, &path),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("subdir");
        fs::create_dir(&dir).unwrap();

        let err = load_stackfile(&dir).await.unwrap_err();
        assert!(matches!(err, StackfileError::Io { .. }));
        assert!(err.to_string().starts_with("Failed to read Stackfile at:"));
    }
}
