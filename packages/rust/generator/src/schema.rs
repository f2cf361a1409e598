//! Schema.org structured data spliced into every generated page.
//!
//! The splice is plain string surgery: no HTML parsing happens here.

use pagesmith_shared::SiteConfig;

/// Closing tag the block is inserted in front of.
const HEAD_END: &str = "</head>";

/// Render the JSON-LD `<script>` block describing the site.
pub fn structured_data_block(site: &SiteConfig) -> String {
    let name = json_str(&site.app_name);
    let url = json_str(site.base_url.trim_end_matches('/'));
    let author = json_str(&site.brand);

    format!(
        r#"
<script type="application/ld+json">
{{
  "@context": "https://schema.org",
  "@type": "WebApplication",
  "name": {name},
  "url": {url},
  "author": {{
    "@type": "Person",
    "name": {author}
  }}
}}
</script>
"#
    )
}

/// Insert `block` right before the first `</head>`, or append it when there is none.
pub fn inject_structured_data(html: &str, block: &str) -> String {
    match html.find(HEAD_END) {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + block.len());
            out.push_str(&html[..idx]);
            out.push_str(block);
            out.push_str(&html[idx..]);
            out
        }
        None => {
            tracing::warn!("generated page has no </head>, appending structured data");
            format!("{html}{block}")
        }
    }
}

fn json_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
