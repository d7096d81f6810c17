//! Fetching and normalizing iCalendar feeds.
//!
//! Feeds are fetched concurrently. A feed that fails or times out is reported
//! as a [`FeedFailure`]; the events of the other feeds are still returned.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::{SemcalError, SemcalResult};
use crate::event::Event;
use crate::ics::parse_calendar;
use crate::normalize::Normalizer;

/// Where to read a feed from, and the category it stands for when feeds are
/// merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub category: Option<String>,
    /// `http(s)://` or `webcal://` URL, or a local path
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedFailure {
    pub category: Option<String>,
    pub location: String,
    pub error: String,
}

/// Result of loading a set of feeds.
#[derive(Debug, Clone, Default)]
pub struct FeedLoad {
    /// Events of all feeds that loaded, in configured feed order
    pub events: Vec<Event>,
    pub failures: Vec<FeedFailure>,
}

impl FeedLoad {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    timeout: Duration,
    normalizer: Normalizer,
}

impl FeedLoader {
    pub fn new(normalizer: Normalizer, timeout: Duration) -> SemcalResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("semcal/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(FeedLoader {
            client,
            timeout,
            normalizer,
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Read the raw text of a feed, bounded by the loader's timeout.
    pub async fn fetch(&self, location: &str) -> SemcalResult<String> {
        match tokio::time::timeout(self.timeout, self.fetch_unbounded(location)).await {
            Ok(result) => result,
            Err(_) => Err(SemcalError::FeedTimeout(self.timeout)),
        }
    }

    async fn fetch_unbounded(&self, location: &str) -> SemcalResult<String> {
        let url = match location.strip_prefix("webcal://") {
            Some(rest) => format!("https://{rest}"),
            None => location.to_string(),
        };

        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            return Ok(response.text().await?);
        }

        let path = shellexpand::tilde(location);
        Ok(tokio::fs::read_to_string(path.as_ref()).await?)
    }

    /// Fetch, parse and normalize one feed.
    pub async fn load_one(&self, source: &FeedSource) -> SemcalResult<Vec<Event>> {
        let content = self.fetch(&source.location).await?;
        let records = parse_calendar(&content)?;
        Ok(self
            .normalizer
            .normalize_all(&records, source.category.as_deref()))
    }

    /// Load all feeds concurrently and merge them in the order given.
    pub async fn load(&self, sources: &[FeedSource]) -> FeedLoad {
        let mut tasks = JoinSet::new();
        for (index, source) in sources.iter().enumerate() {
            let loader = self.clone();
            let source = source.clone();
            tasks.spawn(async move { (index, loader.load_one(&source).await) });
        }

        let mut results: Vec<Option<SemcalResult<Vec<Event>>>> =
            sources.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!("Feed task failed: {}", e),
            }
        }

        let mut load = FeedLoad::default();
        for (source, result) in sources.iter().zip(results) {
            let result = result.unwrap_or_else(|| Err(SemcalError::Feed("task aborted".into())));
            match result {
                Ok(events) => load.events.extend(events),
                Err(e) => {
                    warn!(
                        category = source.category.as_deref().unwrap_or("-"),
                        location = %source.location,
                        "Failed to load feed: {}",
                        e
                    );
                    load.failures.push(FeedFailure {
                        category: source.category.clone(),
                        location: source.location.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            feeds = sources.len(),
            failed = load.failures.len(),
            events = load.events.len(),
            "loaded feeds"
        );
        load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Layout;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::net::TcpListener;

    const BERLIN: chrono_tz::Tz = chrono_tz::Europe::Berlin;

    fn feed_file(events: &[(&str, &str)]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "BEGIN:VCALENDAR\r\nVERSION:2.0\r\n").unwrap();
        for (summary, start) in events {
            write!(
                file,
                "BEGIN:VEVENT\r\nSUMMARY:{summary}\r\nDTSTART:{start}\r\nDTEND:{start}\r\nEND:VEVENT\r\n"
            )
            .unwrap();
        }
        write!(file, "END:VCALENDAR\r\n").unwrap();
        file
    }

    fn source(category: &str, file: &NamedTempFile) -> FeedSource {
        FeedSource {
            category: Some(category.into()),
            location: file.path().display().to_string(),
        }
    }

    fn loader() -> FeedLoader {
        FeedLoader::new(Normalizer::grid(BERLIN), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn merges_feeds_in_configured_order() {
        let algebra = feed_file(&[("Algebra I", "20250310T100000")]);
        let topologie = feed_file(&[
            ("Topologie I", "20250310T080000"),
            ("Topologie II", "20250311T080000"),
        ]);

        let load = loader()
            .load(&[source("Algebra", &algebra), source("Topologie", &topologie)])
            .await;

        assert!(load.is_complete());
        let summaries: Vec<&str> = load.events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Algebra I", "Topologie I", "Topologie II"]);
        assert_eq!(load.events[1].main_category, "Topologie");
        assert_eq!(loader().normalizer().layout(), Layout::Grid);
    }

    #[tokio::test]
    async fn missing_feed_is_reported_and_others_still_load() {
        let algebra = feed_file(&[("Algebra I", "20250310T100000")]);
        let missing = FeedSource {
            category: Some("Analysis".into()),
            location: "/nonexistent/semcal/analysis.ics".into(),
        };

        let load = loader().load(&[missing, source("Algebra", &algebra)]).await;

        assert_eq!(load.events.len(), 1);
        assert_eq!(load.failures.len(), 1);
        assert_eq!(load.failures[0].category.as_deref(), Some("Analysis"));
    }

    /// Accepts connections and never answers them.
    async fn silent_server() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/topologie.ics", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        (url, server)
    }

    #[tokio::test]
    async fn unresponsive_feed_times_out_and_others_still_load() {
        let (url, server) = silent_server().await;
        let algebra = feed_file(&[("Algebra I", "20250310T100000")]);
        let timeout = Duration::from_millis(200);
        let loader = FeedLoader::new(Normalizer::grid(BERLIN), timeout).unwrap();

        assert!(matches!(
            loader.fetch(&url).await,
            Err(SemcalError::FeedTimeout(after)) if after == timeout
        ));

        let hanging = FeedSource {
            category: Some("Topologie".into()),
            location: url.clone(),
        };
        let load = loader.load(&[hanging, source("Algebra", &algebra)]).await;

        assert_eq!(load.events.len(), 1);
        assert_eq!(load.events[0].summary, "Algebra I");
        assert_eq!(load.failures.len(), 1);
        assert_eq!(load.failures[0].location, url);
        assert_eq!(
            load.failures[0].error,
            SemcalError::FeedTimeout(timeout).to_string()
        );
        server.abort();
    }
}
