//! Provider adapter implementations.
//!
//! Each module wraps one vendor's REST search API behind
//! [`crate::provider::SearchProvider`]. Adapters own their authentication,
//! rate-limit detection, and JSON shaping; the orchestrator only sees the
//! trait.

pub mod exa;
pub mod massive;
pub mod tavily;

pub use exa::ExaProvider;
pub use massive::MassiveProvider;
pub use tavily::TavilyProvider;

use chrono::{Days, Utc};
use url::Url;

/// Extract the source domain from a result URL: host with a leading
/// `www.` stripped, or `"unknown"` when the URL has no parseable host.
pub(crate) fn source_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .map(|host| host.trim_start_matches("www.").to_string())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Start of the look-back window as a `YYYY-MM-DD` date string, for
/// providers that filter by publication date.
pub(crate) fn window_start(time_window_days: u32) -> String {
    let today = Utc::now().date_naive();
    today
        .checked_sub_days(Days::new(u64::from(time_window_days)))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}


/// Shared test helper: scoped environment-variable override.
#[cfg(test)]
pub(crate) struct EnvGuard {
    key: &'static str,
    prev: Option<String>,
}

#[cfg(test)]
impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let prev = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, prev }
    }

    pub(crate) fn unset(key: &'static str) -> Self {
        let prev = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, prev }
    }
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        if let Some(value) = self.prev.take() {
            std::env::set_var(self.key, value);
        } else {
            std::env::remove_var(self.key);
        }
    }
}
