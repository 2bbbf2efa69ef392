//! Narrative insights from a language model.
//!
//! The analysis side only builds the prompt; text generation sits behind
//! [`InsightGenerator`] so callers inject whichever backend they use.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockscope_core::{DataError, GroupedMetrics, Result, Symbol, Value};
use tracing::{debug, warn};

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Completion token limit.
pub const MAX_TOKENS: u32 = 1500;
/// Sampling temperature.
pub const TEMPERATURE: f32 = 0.7;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are a financial analyst providing investment insights based on \
fundamental stock data. Be objective, balanced, and highlight both positives and risks. Format \
your response using HTML tags like <h3> for sections and <ul><li> for bullet points.";

/// Produces narrative text for a prompt.
#[async_trait]
pub trait InsightGenerator: Send + Sync + Debug {
    /// Generates insights for the given prompt.
    async fn generate_insights(&self, prompt: &str) -> Result<String>;
}

fn money(value: &Value) -> String {
    value
        .as_f64()
        .map_or_else(|| "N/A".to_string(), |v| format!("${v:.2}"))
}

fn billions(value: &Value) -> String {
    value
        .as_f64()
        .map_or_else(|| "N/A".to_string(), |v| format!("${:.2}B", v / 1e9))
}

fn percent(value: &Value) -> String {
    value
        .as_f64()
        .map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Builds the analyst prompt for a ticker from its grouped metrics.
#[must_use]
pub fn insight_prompt(ticker: &Symbol, metrics: &GroupedMetrics) -> String {
    let company = &metrics.company_info;
    let market = &metrics.market_data;
    let valuation = &metrics.valuation_ratios;
    let profitability = &metrics.profitability_ratios;
    let health = &metrics.financial_health;
    let growth = &metrics.growth_metrics;
    let analyst = &metrics.analyst_recommendations;

    let name = company.text("name").unwrap_or(ticker.as_str());

    format!(
        "Analyze this stock and provide comprehensive investment insights:

**Company:** {name} ({ticker})
**Sector:** {sector} | **Industry:** {industry}

**Valuation Metrics:**
- Current Price: {price}
- Market Cap: {market_cap}
- P/E Ratio: {pe}
- Forward P/E: {forward_pe}
- Price/Book: {pb}
- Price/Sales: {ps}

**Profitability:**
- Profit Margin: {profit_margin}
- Operating Margin: {operating_margin}
- ROE: {roe}
- ROA: {roa}

**Financial Health:**
- Debt/Equity: {de}
- Current Ratio: {current_ratio}
- Free Cash Flow: {fcf}

**Growth:**
- Revenue Growth: {revenue_growth}
- Earnings Growth: {earnings_growth}

**Analyst Opinion:**
- Recommendation: {recommendation}
- Target Price: {target}
- Number of Analysts: {analysts}

Please provide a detailed analysis covering:
1. **Valuation Assessment** - Is the stock overvalued, fairly valued, or undervalued?
2. **Financial Strength** - Comment on profitability, margins, and balance sheet health
3. **Growth Prospects** - Analyze revenue and earnings growth trends
4. **Key Risks** - What are the main risks or concerns?
5. **Investment Recommendation** - Based on this data, what's your investment perspective?

Format the response in clear sections with bullet points where appropriate.",
        sector = company.get("sector"),
        industry = company.get("industry"),
        price = money(market.get("current_price")),
        market_cap = billions(market.get("market_cap")),
        pe = valuation.get("pe_ratio"),
        forward_pe = valuation.get("forward_pe"),
        pb = valuation.get("price_to_book"),
        ps = valuation.get("price_to_sales"),
        profit_margin = percent(profitability.get("profit_margin")),
        operating_margin = percent(profitability.get("operating_margin")),
        roe = percent(profitability.get("roe")),
        roa = percent(profitability.get("roa")),
        de = health.get("debt_to_equity"),
        current_ratio = health.get("current_ratio"),
        fcf = billions(health.get("free_cash_flow")),
        revenue_growth = percent(growth.get("revenue_growth")),
        earnings_growth = percent(growth.get("earnings_growth")),
        recommendation = analyst.get("recommendation"),
        target = money(analyst.get("target_mean_price")),
        analysts = analyst.get("number_of_analyst_opinions"),
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DataError::Parse("Completion has no content".to_string()))
    }
}

/// [`InsightGenerator`] backed by an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiInsights {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client without timeout");
            reqwest::Client::new()
        })
}

impl OpenAiInsights {
    /// Creates a generator for the public OpenAI API.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(api_key, build_client(REQUEST_TIMEOUT))
    }

    /// Creates a generator around an existing HTTP client.
    #[must_use]
    pub fn with_client(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Replaces the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Uses a different API base URL (e.g. a local gateway).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Uses a different chat model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl InsightGenerator for OpenAiInsights {
    async fn generate_insights(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Requesting insights");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: "OpenAI".to_string(),
                retry_after: None,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Network(format!("HTTP {status}: {body}")));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?
            .into_text()
    }
}
