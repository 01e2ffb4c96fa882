//! FileSource - ローカルファイルから CSV を読む

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::LoadError;
use crate::ports::CsvSource;

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl CsvSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| LoadError::Transport {
                location: self.location.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("name_list.csv");
        std::fs::write(&path, "kk,ru,en,gender\n").unwrap();

        let bytes = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(bytes, b"kk,ru,en,gender\n");
    }

    #[tokio::test]
    async fn missing_file_is_transport_error() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.csv"));
        assert!(matches!(
            source.fetch().await,
            Err(LoadError::Transport { .. })
        ));
    }
}
