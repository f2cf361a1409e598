//! The completed-topics record: a pretty-printed JSON array of strings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pagesmith_shared::{PagesmithError, Result};

use crate::write_atomic;

/// Every topic published so far, in publication order. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedTopics(Vec<String>);

impl CompletedTopics {
    /// Load the record. A missing file is an empty record.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no completed topics yet, starting fresh");
                return Ok(Self::default());
            }
            Err(e) => return Err(PagesmithError::io(path, e)),
        };

        let topics: Self = serde_json::from_str(&content).map_err(|e| {
            PagesmithError::parse(format!("invalid {}: {e}", path.display()))
        })?;

        debug!(count = topics.len(), "loaded completed topics");
        Ok(topics)
    }

    /// Rewrite the whole record.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PagesmithError::parse(format!("JSON serialization failed: {e}")))?;
        write_atomic(path, &json)
    }

    pub fn push(&mut self, topic: impl Into<String>) {
        self.0.push(topic.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for CompletedTopics {
    fn from(topics: Vec<String>) -> Self {
        Self(topics)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ps-topics-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = temp_dir();
        let topics = CompletedTopics::load(&tmp.join("completedTopics.json")).unwrap();
        assert!(topics.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let tmp = temp_dir();
        let path = tmp.join("completedTopics.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let err = CompletedTopics::load(&path).unwrap_err();
        assert!(matches!(err, PagesmithError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn save_rewrites_pretty_list() {
        let tmp = temp_dir();
        let path = tmp.join("completedTopics.json");
        std::fs::write(&path, r#"["Why do cats purr?"]"#).unwrap();

        let mut topics = CompletedTopics::load(&path).unwrap();
        topics.push("Why is the sky blue?");
        topics.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[\n  \"Why do cats purr?\",\n  \"Why is the sky blue?\"\n]"
        );
        assert_eq!(CompletedTopics::load(&path).unwrap().len(), 2);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn fixture_loads() {
        let topics =
            CompletedTopics::load(Path::new("../../../fixtures/json/completedTopics.fixture.json"))
                .expect("load fixture");
        assert_eq!(topics.len(), 3);
        assert_eq!(topics.as_slice()[0], "Why do cats purr?");
    }
}
