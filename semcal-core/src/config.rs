//! Global semcal configuration at ~/.config/semcal/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{SemcalError, SemcalResult};
use crate::feed::FeedSource;
use crate::selection::CategoryRule;

static DEFAULT_CALENDAR_NAME: &str = "Semesterkalender";
static DEFAULT_TIMEZONE: &str = "Europe/Berlin";
static DEFAULT_FETCH_TIMEOUT: &str = "30s";
static DEFAULT_ROLLOVER_INTERVAL: &str = "60s";
const DEFAULT_PORT: u16 = 4096;

fn default_calendar_name() -> String {
    DEFAULT_CALENDAR_NAME.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_fetch_timeout() -> String {
    DEFAULT_FETCH_TIMEOUT.to_string()
}

fn default_rollover_interval() -> String {
    DEFAULT_ROLLOVER_INTERVAL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// The semester list: one shared feed, filtered to a set of categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterConfig {
    pub feed: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// One feed of the week/month grid. Its events belong to `category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub category: String,
    pub url: String,
    /// Hex color such as `#1f78b4`
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemcalConfig {
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: String,

    #[serde(default = "default_rollover_interval")]
    pub rollover_interval: String,

    /// Match grid events on any of their categories, not just the main one
    #[serde(default)]
    pub cross_listing: bool,

    pub semester: Option<SemesterConfig>,

    #[serde(default)]
    pub feeds: Vec<FeedConfig>,

    #[serde(default)]
    pub server: ServerConfig,
}

impl SemcalConfig {
    pub fn config_path() -> SemcalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SemcalError::Config("Could not determine config directory".into()))?
            .join("semcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default file first if
    /// there is none.
    pub fn load() -> SemcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path`. `SEMCAL_*` environment variables override file
    /// values; nested keys use `__`, e.g. `SEMCAL_SERVER__PORT`.
    pub fn load_from(path: &Path) -> SemcalResult<Self> {
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());

        let config: SemcalConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SEMCAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| SemcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SemcalError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SemcalResult<()> {
        self.timezone()?;
        self.fetch_timeout()?;
        self.rollover_interval()?;

        let mut seen = std::collections::HashSet::new();
        for feed in &self.feeds {
            if !seen.insert(feed.category.as_str()) {
                return Err(SemcalError::Config(format!(
                    "Category '{}' has more than one feed",
                    feed.category
                )));
            }
        }
        Ok(())
    }

    pub fn timezone(&self) -> SemcalResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SemcalError::UnknownTimezone(self.timezone.clone()))
    }

    pub fn fetch_timeout(&self) -> SemcalResult<Duration> {
        parse_duration("fetch_timeout", &self.fetch_timeout)
    }

    pub fn rollover_interval(&self) -> SemcalResult<Duration> {
        parse_duration("rollover_interval", &self.rollover_interval)
    }

    pub fn category_rule(&self) -> CategoryRule {
        if self.cross_listing {
            CategoryRule::CrossListing
        } else {
            CategoryRule::Strict
        }
    }

    /// Grid categories, in configured feed order.
    pub fn category_names(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.category.clone()).collect()
    }

    pub fn color_for(&self, category: &str) -> Option<&str> {
        self.feeds
            .iter()
            .find(|f| f.category == category)
            .and_then(|f| f.color.as_deref())
    }

    pub fn grid_sources(&self) -> Vec<FeedSource> {
        self.feeds
            .iter()
            .map(|f| FeedSource {
                category: Some(f.category.clone()),
                location: f.url.clone(),
            })
            .collect()
    }

    pub fn semester_source(&self) -> Option<FeedSource> {
        self.semester.as_ref().map(|s| FeedSource {
            category: None,
            location: s.feed.clone(),
        })
    }

    pub fn semester_categories(&self) -> &[String] {
        self.semester
            .as_ref()
            .map(|s| s.categories.as_slice())
            .unwrap_or_default()
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SemcalResult<()> {
        let contents = format!(
            "\
# semcal configuration

# Heading of the calendar:
# calendar_name = \"{DEFAULT_CALENDAR_NAME}\"

# Timezone events are displayed in:
# timezone = \"{DEFAULT_TIMEZONE}\"

# How long to wait for a feed, and how often to check for a new day:
# fetch_timeout = \"{DEFAULT_FETCH_TIMEOUT}\"
# rollover_interval = \"{DEFAULT_ROLLOVER_INTERVAL}\"

# Show grid events under every category they carry, not just the first:
# cross_listing = false

# Semester list, filtered to the given categories:
# [semester]
# feed = \"https://example.org/semester.ics\"
# categories = [\"Algebra\", \"Analysis\"]

# One feed per category for the week and month grid:
# [[feeds]]
# category = \"Algebra\"
# url = \"webcal://example.org/algebra.ics\"
# color = \"#1f78b4\"

# [server]
# port = {DEFAULT_PORT}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SemcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SemcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn parse_duration(key: &str, value: &str) -> SemcalResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| SemcalError::Config(format!("Invalid {key} '{value}': {e}")))
}
