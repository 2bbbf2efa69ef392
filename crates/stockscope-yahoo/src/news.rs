//! Headline stream handling.
//!
//! The news endpoint returns a mixed stream of articles and ads. Each article
//! carries a `content` object whose fields may be missing or null.

use serde::{Deserialize, Serialize};
use stockscope_core::{NewsItem, Symbol, Value, published_label};

/// News stream endpoint.
pub(crate) const NEWS_URL: &str =
    "https://finance.yahoo.com/xhr/ncp?queryRef=latestNews&serviceKey=ncp_fin";

/// Request body selecting the ticker and the number of snippets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewsQuery {
    service_config: ServiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceConfig {
    snippet_count: usize,
    s: Vec<String>,
}

impl NewsQuery {
    pub(crate) fn new(symbol: &Symbol, limit: usize) -> Self {
        Self {
            service_config: ServiceConfig {
                snippet_count: limit,
                s: vec![symbol.to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewsPayload {
    #[serde(default)]
    data: Value,
}

impl NewsPayload {
    /// Returns up to `limit` articles in stream order, skipping ads.
    pub(crate) fn into_items(self, limit: usize) -> Vec<NewsItem> {
        let stream = self
            .data
            .get("tickerStream")
            .and_then(|ticker| ticker.get("stream"));
        let Some(Value::List(entries)) = stream else {
            return Vec::new();
        };

        entries
            .iter()
            .filter(|entry| entry.get("ad").is_none())
            .take(limit)
            .map(|entry| news_item(entry.get("content").unwrap_or(&Value::Absent)))
            .collect()
    }
}

fn news_item(content: &Value) -> NewsItem {
    let defaults = NewsItem::default();
    let text = |value: Option<&Value>, fallback: String| {
        value
            .and_then(Value::as_str)
            .map_or(fallback, str::to_string)
    };

    NewsItem {
        title: text(content.get("title"), defaults.title),
        publisher: text(
            content.get("provider").and_then(|p| p.get("displayName")),
            defaults.publisher,
        ),
        link: text(
            content.get("clickThroughUrl").and_then(|c| c.get("url")),
            defaults.link,
        ),
        published: published_label(
            content
                .get("pubDate")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ),
        thumbnail: thumbnail(content),
    }
}

/// Picks the first resolution of `thumbnail`, then the first of `thumbnails`.
/// Either may be a bare URL string.
fn thumbnail(content: &Value) -> String {
    let primary = match content.get("thumbnail") {
        Some(Value::Text(url)) => url.clone(),
        Some(thumb) => first(thumb.get("resolutions"))
            .and_then(|resolution| resolution.get("url"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        None => String::new(),
    };
    if !primary.is_empty() {
        return primary;
    }

    match first(content.get("thumbnails")) {
        Some(Value::Text(url)) => url.clone(),
        Some(thumb) => thumb
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        None => String::new(),
    }
}

fn first(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::List(items)) => items.first(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> NewsPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_query_body() {
        let body = serde_json::to_value(NewsQuery::new(&Symbol::new("aapl"), 10)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"serviceConfig": {"snippetCount": 10, "s": ["AAPL"]}})
        );
    }

    #[test]
    fn test_into_items() {
        let news = payload(
            r#"{"data": {"tickerStream": {"stream": [
                {"id": "a1", "content": {
                    "title": "Apple unveils new chips",
                    "provider": {"displayName": "Reuters"},
                    "clickThroughUrl": {"url": "https://example.com/a1"},
                    "pubDate": "2025-06-30T14:05:00Z",
                    "thumbnail": {"resolutions": [{"url": "https://img/a1.jpg", "width": 140}]}
                }},
                {"id": "ad", "ad": {"type": "native"}, "content": {"title": "Sponsored"}},
                {"id": "a2", "content": {
                    "title": "Apple supplier outlook",
                    "provider": null,
                    "clickThroughUrl": null,
                    "pubDate": "last week",
                    "thumbnail": null,
                    "thumbnails": ["https://img/a2.jpg"]
                }}
            ]}}}"#,
        );

        let items = news.into_items(10);

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            NewsItem {
                title: "Apple unveils new chips".to_string(),
                publisher: "Reuters".to_string(),
                link: "https://example.com/a1".to_string(),
                published: "June 30, 2025 02:05 PM".to_string(),
                thumbnail: "https://img/a1.jpg".to_string(),
            }
        );
        assert_eq!(items[1].publisher, "Unknown");
        assert_eq!(items[1].link, "#");
        assert_eq!(items[1].published, "last week");
        assert_eq!(items[1].thumbnail, "https://img/a2.jpg");
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let news = payload(
            r#"{"data": {"tickerStream": {"stream": [
                {"id": "x"},
                {"id": "y", "content": {"thumbnail": "https://img/y.jpg", "thumbnails": [{"url": "https://img/z.jpg"}]}}
            ]}}}"#,
        );

        let items = news.into_items(1);

        assert_eq!(items, vec![NewsItem::default()]);
        let all = payload(
            r#"{"data": {"tickerStream": {"stream": [
                {"id": "y", "content": {"thumbnail": "https://img/y.jpg"}},
                {"id": "z", "content": {"thumbnails": [{"url": "https://img/z.jpg"}]}}
            ]}}}"#,
        )
        .into_items(10);
        assert_eq!(all[0].thumbnail, "https://img/y.jpg");
        assert_eq!(all[1].thumbnail, "https://img/z.jpg");
    }

    #[test]
    fn test_empty_stream() {
        assert!(payload(r#"{"data": {}}"#).into_items(10).is_empty());
        assert!(payload("{}").into_items(10).is_empty());
    }
}
