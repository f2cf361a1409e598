//! XML sitemap generation.
//!
//! The sitemap is rebuilt from scratch on every run from the HTML files in the
//! site directory. Entries are collected into a [`Sitemap`] and serialized once.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use url::Url;

use pagesmith_shared::{PAGE_EXTENSION, PagesmithError, Result, SiteConfig};

/// sitemaps.org schema namespace.
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Priority of the site root.
pub const ROOT_PRIORITY: f32 = 1.0;

/// Priority of every generated page.
pub const PAGE_PRIORITY: f32 = 0.8;

/// How often crawlers should expect a URL to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: Url,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// A complete sitemap, root entry first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Serialize to sitemaps.org XML.
    pub fn render(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));

        for entry in &self.entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(entry.loc.as_str())));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                entry.lastmod.format("%Y-%m-%d")
            ));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.changefreq.as_str()
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Collect the site root plus every `.html` file in `dir` other than the index.
///
/// Pages are listed in filename order so reruns produce identical output.
pub fn build_sitemap(
    dir: &Path,
    base_url: &Url,
    index_file: &str,
    today: NaiveDate,
) -> Result<Sitemap> {
    let mut names = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| PagesmithError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| PagesmithError::io(dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| PagesmithError::io(entry.path(), e))?
            .is_file();
        if !is_file {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };

        if name.ends_with(PAGE_EXTENSION) && name != index_file {
            names.push(name);
        }
    }

    names.sort();

    let mut sitemap = Sitemap {
        entries: Vec::with_capacity(names.len() + 1),
    };
    sitemap.entries.push(SitemapEntry {
        loc: base_url.clone(),
        lastmod: today,
        changefreq: ChangeFreq::Daily,
        priority: ROOT_PRIORITY,
    });

    for name in names {
        let loc = base_url.join(&name).map_err(|e| {
            PagesmithError::validation(format!("cannot build sitemap URL for {name}: {e}"))
        })?;
        sitemap.entries.push(SitemapEntry {
            loc,
            lastmod: today,
            changefreq: ChangeFreq::Daily,
            priority: PAGE_PRIORITY,
        });
    }

    Ok(sitemap)
}

/// Rebuild and write the sitemap for `site`. Returns the number of entries.
#[instrument(skip_all, fields(dir = %site.output_dir.display()))]
pub fn generate(site: &SiteConfig, today: NaiveDate) -> Result<usize> {
    let base_url = site.base_url()?;
    let sitemap = build_sitemap(&site.output_dir, &base_url, &site.index_file, today)?;

    let path = site.sitemap_path();
    std::fs::write(&path, sitemap.render()).map_err(|e| PagesmithError::io(&path, e))?;

    info!(path = %path.display(), urls = sitemap.entries.len(), "sitemap written");
    Ok(sitemap.entries.len())
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
