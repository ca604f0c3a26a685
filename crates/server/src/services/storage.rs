// Resume storage on the local filesystem, one directory per application

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{AppError, Result};

#[derive(Clone, Debug)]
pub struct StorageService {
    base_path: PathBuf,
}

impl StorageService {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(self.base_path.join("resumes"))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create storage directory: {e}")))?;
        Ok(())
    }

    fn application_dir(&self, application_id: &str) -> PathBuf {
        self.base_path.join("resumes").join(application_id)
    }

    /// Strips any directory part the browser sent along with the file name.
    pub fn sanitize_file_name(file_name: &str) -> String {
        let name = Path::new(file_name.trim())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .replace(['/', '\\'], "_");

        if name.is_empty() || name == "." || name == ".." {
            "resume".to_string()
        } else {
            name
        }
    }

    /// Writes the resume and returns the URL it is served from.
    pub async fn save_resume(
        &self,
        application_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let dir = self.application_dir(application_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create directories: {e}")))?;

        let file_name = Self::sanitize_file_name(file_name);
        fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write resume: {e}")))?;

        Ok(format!("/api/applications/{application_id}/resume"))
    }

    pub async fn read_resume(&self, application_id: &str, file_name: &str) -> Result<Vec<u8>> {
        let path = self
            .application_dir(application_id)
            .join(Self::sanitize_file_name(file_name));

        if !path.exists() {
            return Err(AppError::NotFound("Resume not found".to_string()));
        }

        fs::read(&path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read resume: {e}")))
    }

    pub async fn delete_application(&self, application_id: &str) -> Result<()> {
        let dir = self.application_dir(application_id);
        if dir.exists() {
            fs::remove_dir_all(&dir).await.map_err(|e| {
                AppError::Internal(format!("Failed to delete resume directory: {e}"))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> StorageService {
        let dir = std::env::temp_dir().join(format!("jobboard-test-{}", uuid::Uuid::new_v4()));
        StorageService::new(dir)
    }

    #[test]
    fn file_names_lose_their_directories() {
        assert_eq!(StorageService::sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(StorageService::sanitize_file_name("C:\\docs\\cv.pdf"), "C:_docs_cv.pdf");
        assert_eq!(StorageService::sanitize_file_name(".."), "resume");
        assert_eq!(StorageService::sanitize_file_name("cv.pdf"), "cv.pdf");
    }

    #[tokio::test]
    async fn saved_resume_reads_back_and_deletes() {
        let storage = temp_storage();
        storage.init().await.unwrap();

        let url = storage.save_resume("a1", "cv.pdf", b"%PDF-1.7").await.unwrap();
        assert_eq!(url, "/api/applications/a1/resume");
        assert_eq!(storage.read_resume("a1", "cv.pdf").await.unwrap(), b"%PDF-1.7");

        storage.delete_application("a1").await.unwrap();
        assert!(matches!(
            storage.read_resume("a1", "cv.pdf").await,
            Err(AppError::NotFound(_))
        ));
        let _ = std::fs::remove_dir_all(&storage.base_path);
    }
}
