//! Index document maintenance.
//!
//! The index is edited by literal substitution around two markers: the closing
//! `</ul>` of the topic list and the `<span id="topic-count">N</span>` counter.
//! Each must occur exactly once; anything else is rejected before the file is
//! touched.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use pagesmith_shared::{PagesmithError, Result};

/// Closing tag of the topic list; new entries go directly in front of it.
pub const LIST_END_MARKER: &str = "</ul>";

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span id="topic-count">(\d+)</span>"#).expect("valid regex")
});

/// The index after adding one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexUpdate {
    /// Full new document text.
    pub content: String,
    /// Counter value written into the document.
    pub topic_count: u64,
}

/// Adds a published page to the index document.
pub trait IndexUpdater: Send + Sync {
    /// Return the updated document for `index` with a link to `filename`.
    fn add_entry(&self, index: &str, topic: &str, filename: &str) -> Result<IndexUpdate>;
}

/// Marker-substitution updater matching the hand-written index layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerIndexUpdater;

impl IndexUpdater for MarkerIndexUpdater {
    fn add_entry(&self, index: &str, topic: &str, filename: &str) -> Result<IndexUpdate> {
        let list_ends = index.matches(LIST_END_MARKER).count();
        if list_ends != 1 {
            return Err(PagesmithError::validation(format!(
                "index must contain exactly one `{LIST_END_MARKER}`, found {list_ends}"
            )));
        }

        let counters: Vec<_> = COUNT_RE.captures_iter(index).collect();
        if counters.len() != 1 {
            return Err(PagesmithError::validation(format!(
                "index must contain exactly one topic-count span, found {}",
                counters.len()
            )));
        }

        let current: u64 = counters[0][1].parse().map_err(|e| {
            PagesmithError::validation(format!("topic-count is not a valid number: {e}"))
        })?;
        let topic_count = current
            .checked_add(1)
            .ok_or_else(|| PagesmithError::validation("topic-count overflow"))?;

        // Counter first: the inserted topic text must never be mistaken for a marker.
        let counted = COUNT_RE.replace(
            index,
            NoExpand(&format!(r#"<span id="topic-count">{topic_count}</span>"#)),
        );

        let link = format!(r#"<li><a href="/{filename}">{topic}</a></li>"#);
        let content = counted.replacen(
            LIST_END_MARKER,
            &format!("  {link}\n    {LIST_END_MARKER}"),
            1,
        );

        Ok(IndexUpdate {
            content,
            topic_count,
        })
    }
}
