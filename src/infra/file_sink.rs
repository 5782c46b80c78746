use crate::app::ports::DocumentSinkPort;
use crate::error::{PdpError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes each document to `<dir>/<product id>.json`
pub struct FileDocumentSink {
    dir: PathBuf,
}

impl FileDocumentSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, product_id: &str) -> Result<PathBuf> {
        if product_id.is_empty()
            || product_id.contains(['/', '\\'])
            || product_id == "."
            || product_id == ".."
        {
            return Err(PdpError::UnsafeIdentifier(product_id.to_string()));
        }
        Ok(self.dir.join(format!("{product_id}.json")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentSinkPort for FileDocumentSink {
    async fn write(&self, product_id: &str, contents: &str) -> Result<String> {
        let path = self.path_for(product_id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, contents).await?;
        Ok(path.display().to_string())
    }
}
