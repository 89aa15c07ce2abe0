pub mod local;

use crate::error::Result;
use async_trait::async_trait;

pub use local::LocalObjectStore;

/// Attachment blob storage. `put` writes the bytes under `path` and returns
/// a URL the recipient can resolve.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String>;
}

/// Strip anything that could escape the storage root from a client-supplied
/// file name: keep only the final path component and drop leading dots.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");
    let cleaned = base.trim_start_matches('.').trim();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_only_the_base_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\evil\\report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name("logo final.png"), "logo final.png");
    }

    #[test]
    fn test_sanitize_empty_name_falls_back() {
        assert_eq!(sanitize_file_name(""), "attachment");
        assert_eq!(sanitize_file_name("..."), "attachment");
    }
}
