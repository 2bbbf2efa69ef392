//! Headlines for a ticker and for the market as a whole.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Number of headlines returned for a ticker.
pub const DEFAULT_NEWS_LIMIT: usize = 10;

/// Fixed market-wide headlines.
pub const MARKET_HEADLINES: [&str; 10] = [
    "📊 S&P 500 reaches new all-time high",
    "💼 Tech stocks lead market rally",
    "📈 Fed holds interest rates steady",
    "🏦 Banking sector shows strong earnings",
    "⚡ Energy stocks surge on supply concerns",
    "🔬 Biotech IPO raises $500M",
    "🚗 Auto industry sees recovery signs",
    "🏠 Housing market shows resilience",
    "💰 Crypto market cap exceeds $2T",
    "🌐 Global markets trade higher",
];

const PUBLISHED_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// One headline about a ticker.
///
/// Fields the source leaves out keep their [`Default`] placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Publishing outlet.
    pub publisher: String,
    /// Article URL.
    pub link: String,
    /// Human readable publish time, see [`published_label`].
    pub published: String,
    /// Thumbnail URL, empty when there is none.
    pub thumbnail: String,
}

impl Default for NewsItem {
    fn default() -> Self {
        Self {
            title: "No title".to_string(),
            publisher: "Unknown".to_string(),
            link: "#".to_string(),
            published: "Unknown date".to_string(),
            thumbnail: String::new(),
        }
    }
}

/// Formats an ISO-8601 publish timestamp as `June 30, 2025 02:05 PM`.
///
/// Unparseable input is returned unchanged; empty input becomes `Unknown date`.
#[must_use]
pub fn published_label(raw: &str) -> String {
    if raw.is_empty() {
        return "Unknown date".to_string();
    }
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |dt| dt.format(PUBLISHED_FORMAT).to_string(),
    )
}

/// Returns the market-wide headlines.
#[must_use]
pub fn market_headlines() -> Vec<String> {
    MARKET_HEADLINES.iter().map(|&h| h.to_string()).collect()
}
