//! End-to-end run: topic → page → publish → sitemap → notify.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};
use url::Url;

use pagesmith_generator::{GeminiClient, generate_page, generate_topic};
use pagesmith_notifier::TelegramNotifier;
use pagesmith_publisher::{PublishConfig, prepare_page, publish};
use pagesmith_shared::{AppConfig, PagesmithError, Result, RunId};

use crate::context::RunContext;

/// Result of a completed run.
#[derive(Debug)]
pub struct RunResult {
    pub run_id: RunId,
    /// The generated question.
    pub topic: String,
    /// Published file name (slug + `.html`).
    pub filename: String,
    pub page_path: PathBuf,
    /// Public URL of the new page.
    pub page_url: Url,
    /// Counter value now shown in the index.
    pub topic_count: u64,
    /// Number of sitemap URLs, or `None` if rebuilding it failed.
    pub sitemap_urls: Option<usize>,
    /// Whether the chat notification went out.
    pub notified: bool,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the run completes.
    fn done(&self, result: &RunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &RunResult) {}
}

/// Run the full pipeline once.
///
/// 1. Generate a topic not in the completed list
/// 2. Generate the page HTML and inject structured data
/// 3. Write the page, the completed-topics record, and the index
/// 4. Rebuild the sitemap (failure is logged, not fatal)
/// 5. Send the chat notification (failure is logged, not fatal)
///
/// Nothing is retried or rolled back.
#[instrument(skip_all, fields(run_id = %ctx.run_id))]
pub async fn run(ctx: &mut RunContext, progress: &dyn ProgressReporter) -> Result<RunResult> {
    let start = Instant::now();
    let site = &ctx.config.site;

    info!(completed = ctx.topics.len(), "starting run");

    // --- Phase 1: Topic ---
    progress.phase("Generating topic");
    let client = GeminiClient::new(&ctx.config.gemini, ctx.secrets.gemini_api_key.as_str())?;
    let topic = generate_topic(&client, site, ctx.topics.as_slice())
        .await?
        .ok_or_else(|| PagesmithError::generation("No topic generated."))?;

    // --- Phase 2: Page ---
    progress.phase("Generating page");
    let html = generate_page(&client, site, &topic).await?;
    let page = prepare_page(&topic, html)?;
    let page_url = site.page_url(&page.filename)?;

    // --- Phase 3: Publish ---
    progress.phase("Publishing");
    let published = publish(
        &PublishConfig::from(site),
        &mut ctx.topics,
        &page,
        &*ctx.index_updater,
    )?;
    info!(filename = %page.filename, "generated");

    // --- Phase 4: Sitemap ---
    progress.phase("Writing sitemap");
    let sitemap_urls = match pagesmith_sitemap::generate(site, Utc::now().date_naive()) {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "failed to generate sitemap");
            None
        }
    };

    // --- Phase 5: Notify ---
    let notified = match &ctx.secrets.telegram {
        Some(tg) => {
            progress.phase("Sending notification");
            let sent = match TelegramNotifier::new(&ctx.config.telegram, tg) {
                Ok(notifier) => notifier.send_page(&page.topic, &page_url).await,
                Err(e) => Err(e),
            };
            match sent {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "failed to send telegram notification");
                    false
                }
            }
        }
        None => false,
    };

    let result = RunResult {
        run_id: ctx.run_id.clone(),
        topic: page.topic,
        filename: page.filename,
        page_path: published.page_path,
        page_url,
        topic_count: published.topic_count,
        sitemap_urls,
        notified,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        topic = %result.topic,
        topic_count = result.topic_count,
        notified = result.notified,
        elapsed_ms = result.elapsed.as_millis(),
        "run complete"
    );

    Ok(result)
}

/// Rebuild only the sitemap. Returns the number of URLs written.
pub fn regenerate_sitemap(config: &AppConfig) -> Result<usize> {
    pagesmith_sitemap::generate(&config.site, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use pagesmith_publisher::{CompletedTopics, IndexUpdate, IndexUpdater};
    use pagesmith_shared::{Secrets, SiteConfig, TelegramSecrets};

    use super::*;

    const INDEX: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Questions answered: <span id="topic-count">1</span></h1>
  <ul>
      <li><a href="/why-do-cats-purr.html">Why do cats purr?</a></li>
    </ul>
</body>
</html>
"#;

    const PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<title>Rayleigh did it</title>\n</head>\n<body><h1>Physics.</h1><p>Blame the air.</p><footer>— Cipher Nichu</footer></body>\n</html>";

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ps-run-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn candidate(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [ { "content": { "parts": [ { "text": text } ] } } ]
        })
    }

    fn seed_site(root: &Path) {
        std::fs::write(root.join("index.html"), INDEX).unwrap();
        std::fs::write(root.join("why-do-cats-purr.html"), "<html></html>").unwrap();
        std::fs::write(root.join("completedTopics.json"), r#"["Why do cats purr?"]"#).unwrap();
    }

    fn context(root: &Path, server: &MockServer, telegram: bool) -> RunContext {
        let mut config = AppConfig::default();
        config.site = SiteConfig {
            output_dir: root.to_path_buf(),
            completed_topics_file: root.join("completedTopics.json"),
            ..SiteConfig::default()
        };
        config.gemini.api_base = server.uri();
        config.telegram.api_base = server.uri();
        config.telegram.enabled = telegram;

        let secrets = Secrets {
            gemini_api_key: "test-key".into(),
            telegram: telegram.then(|| TelegramSecrets {
                bot_token: "123:abc".into(),
                chat_id: "-10042".into(),
            }),
        };

        RunContext::with_secrets(config, secrets).unwrap()
    }

    async fn mount_generation(server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_string_contains("Avoid these topics"))
            .and(body_string_contains("Why do cats purr?"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate("Why is the sky blue?\n")),
            )
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(body_string_contains("The search query (topic) is"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(PAGE)))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn full_run_publishes_page() {
        let tmp = temp_dir();
        seed_site(&tmp);
        let server = MockServer::start().await;
        mount_generation(&server).await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_string_contains("why-is-the-sky-blue.html"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let mut ctx = context(&tmp, &server, true);
        let result = run(&mut ctx, &SilentProgress).await.unwrap();

        assert_eq!(result.topic, "Why is the sky blue?");
        assert_eq!(result.filename, "why-is-the-sky-blue.html");
        assert_eq!(
            result.page_url.as_str(),
            "https://fun.nichu.dev/why-is-the-sky-blue.html"
        );
        assert_eq!(result.topic_count, 2);
        assert_eq!(result.sitemap_urls, Some(3));
        assert!(result.notified);

        let page = std::fs::read_to_string(tmp.join("why-is-the-sky-blue.html")).unwrap();
        assert!(page.contains("application/ld+json"));
        assert!(page.find("application/ld+json").unwrap() < page.find("</head>").unwrap());

        let topics = CompletedTopics::load(&tmp.join("completedTopics.json")).unwrap();
        assert_eq!(topics.as_slice(), ["Why do cats purr?", "Why is the sky blue?"]);

        let index = std::fs::read_to_string(tmp.join("index.html")).unwrap();
        assert!(index.contains(r#"<span id="topic-count">2</span>"#));
        assert!(index.contains(
            r#"<li><a href="/why-is-the-sky-blue.html">Why is the sky blue?</a></li>"#
        ));

        let sitemap = std::fs::read_to_string(tmp.join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), 3);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn missing_topic_aborts_without_writes() {
        let tmp = temp_dir();
        seed_site(&tmp);
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut ctx = context(&tmp, &server, true);
        let err = run(&mut ctx, &SilentProgress).await.unwrap_err();
        assert!(err.to_string().contains("No topic generated."));

        assert_eq!(std::fs::read_to_string(tmp.join("index.html")).unwrap(), INDEX);
        assert!(!tmp.join("sitemap.xml").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn invalid_html_aborts_before_writes() {
        let tmp = temp_dir();
        seed_site(&tmp);
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("Avoid these topics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Why?")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("The search query (topic) is"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Sorry, I can't.")))
            .mount(&server)
            .await;

        let mut ctx = context(&tmp, &server, false);
        let err = run(&mut ctx, &SilentProgress).await.unwrap_err();
        assert!(err.to_string().contains("Invalid HTML."));

        assert!(!tmp.join("why.html").exists());
        assert_eq!(ctx.topics.len(), 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn notification_failure_is_not_fatal() {
        let tmp = temp_dir();
        seed_site(&tmp);
        let server = MockServer::start().await;
        mount_generation(&server).await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut ctx = context(&tmp, &server, true);
        let result = run(&mut ctx, &SilentProgress).await.unwrap();

        assert!(!result.notified);
        assert!(tmp.join("why-is-the-sky-blue.html").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn sitemap_failure_is_not_fatal() {
        let tmp = temp_dir();
        seed_site(&tmp);
        std::fs::create_dir_all(tmp.join("sitemap.xml")).unwrap();
        let server = MockServer::start().await;
        mount_generation(&server).await;

        let mut ctx = context(&tmp, &server, false);
        let result = run(&mut ctx, &SilentProgress).await.unwrap();

        assert_eq!(result.sitemap_urls, None);
        assert_eq!(result.topic_count, 2);
        assert!(tmp.join("why-is-the-sky-blue.html").exists());
        assert!(tmp.join("sitemap.xml").is_dir());

        let index = std::fs::read_to_string(tmp.join("index.html")).unwrap();
        assert!(index.contains(r#"<span id="topic-count">2</span>"#));
        assert!(index.contains(r#"<a href="/why-is-the-sky-blue.html">"#));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    struct FixedIndex {
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl IndexUpdater for FixedIndex {
        fn add_entry(&self, _index: &str, topic: &str, filename: &str) -> Result<IndexUpdate> {
            self.calls
                .lock()
                .unwrap()
                .push((topic.to_string(), filename.to_string()));
            Ok(IndexUpdate {
                content: "<p>rebuilt</p>\n".into(),
                topic_count: 42,
            })
        }
    }

    #[tokio::test]
    async fn custom_index_updater_handles_index_edit() {
        let tmp = temp_dir();
        seed_site(&tmp);
        let server = MockServer::start().await;
        mount_generation(&server).await;

        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut ctx = context(&tmp, &server, false).with_index_updater(FixedIndex {
            calls: Arc::clone(&calls),
        });
        let result = run(&mut ctx, &SilentProgress).await.unwrap();

        assert_eq!(result.topic_count, 42);
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            [(
                "Why is the sky blue?".to_string(),
                "why-is-the-sky-blue.html".to_string()
            )]
        );
        assert_eq!(
            std::fs::read_to_string(tmp.join("index.html")).unwrap(),
            "<p>rebuilt</p>\n"
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn disabled_telegram_skips_notification() {
        let tmp = temp_dir();
        seed_site(&tmp);
        let server = MockServer::start().await;
        mount_generation(&server).await;

        let mut ctx = context(&tmp, &server, false);
        let result = run(&mut ctx, &SilentProgress).await.unwrap();

        assert!(!result.notified);
        assert_eq!(result.topic_count, 2);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn regenerate_sitemap_lists_existing_pages() {
        let tmp = temp_dir();
        seed_site(&tmp);

        let mut config = AppConfig::default();
        config.site.output_dir = tmp.clone();

        assert_eq!(regenerate_sitemap(&config).unwrap(), 2);
        assert!(tmp.join("sitemap.xml").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
