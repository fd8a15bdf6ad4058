use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Storage the reference documents are read from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Read a whole document as UTF-8 text
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads documents from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

#[async_trait]
impl DocumentSource for FsSource {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
