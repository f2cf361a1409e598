//! Writes a generated page to the site directory and records it.
//!
//! Publishing a page touches three files: the page itself, the
//! completed-topics record, and the index document. The index edit is
//! prepared (and validated) before any of them is written.

pub mod index;
pub mod slug;
pub mod topics;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use pagesmith_shared::{GeneratedPage, PagesmithError, Result, SiteConfig};

pub use index::{IndexUpdate, IndexUpdater, LIST_END_MARKER, MarkerIndexUpdater};
pub use slug::{page_filename, slugify};
pub use topics::CompletedTopics;

/// Substring every accepted page must contain.
const HTML_OPEN_TAG: &str = "<html";

/// Where published files live.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Directory pages are written to.
    pub output_dir: PathBuf,
    /// Index document inside `output_dir`.
    pub index_path: PathBuf,
    /// Completed-topics JSON record.
    pub completed_topics_path: PathBuf,
}

impl From<&SiteConfig> for PublishConfig {
    fn from(site: &SiteConfig) -> Self {
        Self {
            output_dir: site.output_dir.clone(),
            index_path: site.index_path(),
            completed_topics_path: site.completed_topics_file.clone(),
        }
    }
}

/// Output of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Path of the written page.
    pub page_path: PathBuf,
    /// Counter value now shown in the index.
    pub topic_count: u64,
    /// Number of entries in the completed-topics record.
    pub completed_count: usize,
}

/// Check generated HTML and pair it with the topic's filename.
///
/// Fails when there is no HTML, when it lacks an `<html` tag, or when the topic
/// has no characters usable in a filename.
pub fn prepare_page(topic: &str, html: Option<String>) -> Result<GeneratedPage> {
    let html = match html {
        Some(html) if html.contains(HTML_OPEN_TAG) => html,
        _ => return Err(PagesmithError::validation("Invalid HTML.")),
    };

    if slugify(topic).is_empty() {
        return Err(PagesmithError::validation(format!(
            "topic '{topic}' has no characters usable in a filename"
        )));
    }

    Ok(GeneratedPage {
        topic: topic.to_string(),
        filename: page_filename(topic),
        html,
    })
}

/// Write `page`, append its topic to `topics`, and link it from the index.
///
/// An existing page with the same filename is overwritten.
#[instrument(skip_all, fields(filename = %page.filename))]
pub fn publish(
    config: &PublishConfig,
    topics: &mut CompletedTopics,
    page: &GeneratedPage,
    updater: &dyn IndexUpdater,
) -> Result<PublishResult> {
    let index = std::fs::read_to_string(&config.index_path)
        .map_err(|e| PagesmithError::io(&config.index_path, e))?;
    let update = updater.add_entry(&index, &page.topic, &page.filename)?;

    let page_path = config.output_dir.join(&page.filename);
    if page_path.exists() {
        debug!(path = %page_path.display(), "overwriting existing page");
    }
    std::fs::write(&page_path, &page.html).map_err(|e| PagesmithError::io(&page_path, e))?;
    info!(path = %page_path.display(), bytes = page.html.len(), "page written");

    topics.push(page.topic.clone());
    topics.save(&config.completed_topics_path)?;
    debug!(count = topics.len(), "completed topics saved");

    write_atomic(&config.index_path, &update.content)?;
    info!(topic_count = update.topic_count, "index updated");

    Ok(PublishResult {
        page_path,
        topic_count: update.topic_count,
        completed_count: topics.len(),
    })
}

/// Write via a sibling temp file and rename over the target.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PagesmithError::validation(format!("not a file path: {}", path.display())))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| PagesmithError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| PagesmithError::io(path, e))?;

    debug!(path = %path.display(), "wrote file");
    Ok(())
}
