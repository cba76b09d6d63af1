//! Storefront: a resilient catalog client and product browsing core.
//!
//! The crate provides:
//! - Typed access to a REST product catalog with classified, user-facing errors
//! - A time-bounded response cache and exponential-backoff retries
//! - Debounce and throttle primitives driven by an injectable clock
//! - A pure filter engine for search text and category selection
//! - An event/action state machine producing renderable view models

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Query/Pacing  │   │ Worker Layer  │
//! │ (ui/)         │   │ (query/,      │   │ (worker/)     │
//! │ - View models │   │  pacing/)     │   │ - Cache       │
//! │ - Formatting  │   │ - Filtering   │   │ - Retry       │
//! │ - Text render │   │ - Debounce    │   │ - Trace links │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  API Layer (api/)                                   │
//! │  - Transport (reqwest) and error classification     │
//! │  - Catalog service, response cache, retry policy    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure & Observability             │
//! │  - Product, ApiError, StorefrontError (domain/)     │
//! │  - Config and trace paths (infrastructure/)         │
//! │  - tracing + OpenTelemetry export (observability/)  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! [`Config`] is read from `~/.config/storefront/config.toml` when present.
//! Durations are given in milliseconds:
//!
//! ```toml
//! base_url = "https://fakestoreapi.com"
//! request_timeout_ms = 10000
//! cache_ttl_ms = 300000
//! retry_max_attempts = 3
//! retry_base_delay_ms = 1000
//! search_debounce_ms = 300
//! refresh_throttle_ms = 2000
//! trace_level = "info"
//! trace_file = "otlp.json"
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mockable::DefaultClock;
//! use storefront::{handle_event, AppState, Config, Event, Product, WorkerResponse};
//!
//! let mut state = AppState::new(Arc::new(DefaultClock), &Config::default());
//! handle_event(&mut state, &Event::Start)?;
//!
//! let products = vec![
//!     Product::new(1, "Backpack", 109.95, "men's clothing"),
//!     Product::new(2, "Gold Ring", 168.0, "jewelery"),
//! ];
//! handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ProductsLoaded { products }))?;
//! handle_event(&mut state, &Event::SelectCategory("jewelery".to_string()))?;
//!
//! assert_eq!(state.visible_products.len(), 1);
//! # Ok::<(), storefront::StorefrontError>(())
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod pacing;
pub mod query;
pub mod ui;
pub mod worker;

#[cfg(test)]
mod test_support;

pub use app::{handle_event, Action, AppState, Event, LoadPhase, Screen};
pub use domain::{ApiError, ErrorCode, Product, Rating, Result, StorefrontError};
pub use worker::{CatalogWorker, WorkerMessage, WorkerResponse};

use api::{CatalogService, ReqwestTransport, RetryPolicy, TokioSleeper};
use mockable::{Clock, DefaultClock};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default delay before a search query is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default minimum interval between user-triggered refreshes.
pub const DEFAULT_REFRESH_THROTTLE: Duration = Duration::from_millis(2000);

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Catalog service root. Default: `https://fakestoreapi.com`
    pub base_url: String,

    /// Per-request timeout. Default: 10 s
    pub request_timeout: Duration,

    /// Lifetime of cached responses. Default: 5 min
    pub cache_ttl: Duration,

    /// Total attempts per request, including the first. Default: 3
    pub retry_max_attempts: u32,

    /// Delay before the first retry; doubles for each further retry. Default: 1 s
    pub retry_base_delay: Duration,

    pub search_debounce: Duration,

    pub refresh_throttle: Duration,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// OTLP JSON span export target; relative paths go under the data
    /// directory. Export is off when unset.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            request_timeout: api::DEFAULT_TIMEOUT,
            cache_ttl: api::DEFAULT_TTL,
            retry_max_attempts: api::retry::DEFAULT_MAX_RETRIES,
            retry_base_delay: api::retry::DEFAULT_BASE_DELAY,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            refresh_throttle: DEFAULT_REFRESH_THROTTLE,
            trace_level: None,
            trace_file: None,
        }
    }
}

/// On-disk form of [`Config`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    cache_ttl_ms: Option<u64>,
    retry_max_attempts: Option<u32>,
    retry_base_delay_ms: Option<u64>,
    search_debounce_ms: Option<u64>,
    refresh_throttle_ms: Option<u64>,
    trace_level: Option<String>,
    trace_file: Option<PathBuf>,
}

impl Config {
    /// Parses configuration from a string map, such as environment-style
    /// key/value pairs.
    ///
    /// Keys match the TOML file. Missing, blank, or unparsable values fall
    /// back to their defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use storefront::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("retry_max_attempts".to_string(), "5".to_string());
    /// map.insert("cache_ttl_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.retry_max_attempts, 5);
    /// assert_eq!(config.cache_ttl, Duration::from_secs(300));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let millis = |key: &str, fallback: Duration| {
            text(key)
                .and_then(|v| v.parse::<u64>().ok())
                .map_or(fallback, Duration::from_millis)
        };

        Self {
            base_url: text("base_url").map_or(defaults.base_url, String::from),
            request_timeout: millis("request_timeout_ms", defaults.request_timeout),
            cache_ttl: millis("cache_ttl_ms", defaults.cache_ttl),
            retry_max_attempts: text("retry_max_attempts")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_max_attempts),
            retry_base_delay: millis("retry_base_delay_ms", defaults.retry_base_delay),
            search_debounce: millis("search_debounce_ms", defaults.search_debounce),
            refresh_throttle: millis("refresh_throttle_ms", defaults.refresh_throttle),
            trace_level: text("trace_level").map(String::from),
            trace_file: text("trace_file").map(PathBuf::from),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] for malformed TOML, unknown keys,
    /// or a `base_url` that is not an absolute http(s) URL.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        let defaults = Self::default();
        let millis = |value: Option<u64>, fallback: Duration| value.map_or(fallback, Duration::from_millis);

        let config = Self {
            base_url: file.base_url.unwrap_or(defaults.base_url),
            request_timeout: millis(file.request_timeout_ms, defaults.request_timeout),
            cache_ttl: millis(file.cache_ttl_ms, defaults.cache_ttl),
            retry_max_attempts: file.retry_max_attempts.unwrap_or(defaults.retry_max_attempts),
            retry_base_delay: millis(file.retry_base_delay_ms, defaults.retry_base_delay),
            search_debounce: millis(file.search_debounce_ms, defaults.search_debounce),
            refresh_throttle: millis(file.refresh_throttle_ms, defaults.refresh_throttle),
            trace_level: file.trace_level,
            trace_file: file.trace_file,
        };
        config.base_url()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Config::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` when given, else the default config file when it exists,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Config::from_file`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match infrastructure::default_config_file() {
            Some(default) if default.is_file() => {
                tracing::debug!(path = %default.display(), "loading config file");
                Self::from_file(&default)
            }
            _ => Ok(Self::default()),
        }
    }

    /// The parsed service root.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] unless `base_url` is an absolute
    /// http(s) URL.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| StorefrontError::Config(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StorefrontError::Config(format!(
                "base_url {:?} must use http or https",
                self.base_url
            )));
        }
        Ok(url)
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_max_attempts, self.retry_base_delay)
    }
}

/// Builds the catalog worker and an empty application state.
///
/// Both share one wall clock, so cache expiry and input pacing agree.
///
/// # Errors
///
/// Returns an error for an invalid `base_url` or if the HTTP client cannot be
/// built.
pub fn initialize(config: &Config) -> Result<(AppState, CatalogWorker)> {
    tracing::debug!(base_url = %config.base_url, "initializing storefront");

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let transport = ReqwestTransport::new(config.request_timeout)?;
    let service = CatalogService::new(Arc::new(transport), config.base_url()?);
    let worker = CatalogWorker::new(
        service,
        config.cache_ttl,
        config.retry_policy(),
        Arc::new(TokioSleeper),
        clock.clone(),
    );

    Ok((AppState::new(clock, config), worker))
}
