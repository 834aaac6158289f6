//! Writing task results to disk

use crew_core::{CrewError, Result};
use std::path::Path;
use tracing::info;

/// Write `content` to `path`, replacing any previous file and creating parent directories
pub async fn write_output(path: &Path, content: &str) -> Result<()> {
    let sink_error = |source| CrewError::OutputSink {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(sink_error)?;
    }
    tokio::fs::write(path, content).await.map_err(sink_error)?;

    info!(path = %path.display(), bytes = content.len(), "Task output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("investment_recommendation.md");

        write_output(&path, "first run, a much longer text").await.unwrap();
        write_output(&path, "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let err = write_output(&blocker.join("out.md"), "text").await.unwrap_err();
        assert!(matches!(err, CrewError::OutputSink { .. }));
    }
}
