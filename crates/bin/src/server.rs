//! JSON HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use stockscope::{
    AnalysisOutcome, Comparison, GroupedMetrics, MarketMovers, ReportRequest, Stockscope,
    TickerNews,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::AppError;

type AppState = Arc<Stockscope>;

/// Request bodies that fail to parse become a 400 envelope.
type Payload<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompareRequest {
    #[serde(default)]
    tickers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct InsightsRequest {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    analysis: GroupedMetrics,
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    success: bool,
    insights: String,
}

/// Gainers and losers wrapped in a success envelope.
#[derive(Debug, Serialize)]
pub(crate) struct MoversResponse {
    success: bool,
    #[serde(flatten)]
    movers: MarketMovers,
}

impl MoversResponse {
    pub(crate) const fn new(movers: MarketMovers) -> Self {
        Self {
            success: true,
            movers,
        }
    }
}

/// A ticker's headlines wrapped in a success envelope.
#[derive(Debug, Serialize)]
pub(crate) struct NewsResponse {
    success: bool,
    #[serde(flatten)]
    news: TickerNews,
}

impl NewsResponse {
    pub(crate) const fn new(news: TickerNews) -> Self {
        Self {
            success: true,
            news,
        }
    }
}

/// Market headlines wrapped in a success envelope.
#[derive(Debug, Serialize)]
pub(crate) struct MarketNewsResponse {
    success: bool,
    news: Vec<String>,
}

impl MarketNewsResponse {
    pub(crate) const fn new(news: Vec<String>) -> Self {
        Self {
            success: true,
            news,
        }
    }
}

/// Builds the API router.
pub(crate) fn router(service: Stockscope) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/compare", post(compare))
        .route("/api/generate-pdf", post(generate_pdf))
        .route("/api/ai-insights", post(ai_insights))
        .route("/api/market-movers", get(market_movers))
        .route("/api/market-news", get(market_news))
        .route("/api/stock-news/:ticker", get(stock_news))
        .with_state(Arc::new(service))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves the API until the process is stopped.
pub(crate) async fn serve(service: Stockscope, addr: SocketAddr) -> anyhow::Result<()> {
    info!(insights = service.has_insights(), "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze(
    State(service): State<AppState>,
    payload: Payload<AnalyzeRequest>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let Json(request) = payload?;
    let ticker = request.ticker.unwrap_or_default();
    debug!(ticker = %ticker, "Analyze request");
    Ok(Json(service.analyze(&ticker).await?))
}

async fn compare(
    State(service): State<AppState>,
    payload: Payload<CompareRequest>,
) -> Result<Json<Comparison>, AppError> {
    let Json(request) = payload?;
    debug!(tickers = ?request.tickers, "Compare request");
    Ok(Json(service.compare(&request.tickers).await?))
}

async fn generate_pdf(
    State(service): State<AppState>,
    payload: Payload<ReportRequest>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    debug!(ticker = %request.ticker, "Report request");
    let report = service.report(&request, Local::now().naive_local())?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename),
        ),
    ];
    Ok((headers, report.bytes).into_response())
}

async fn ai_insights(
    State(service): State<AppState>,
    payload: Payload<InsightsRequest>,
) -> Result<Json<InsightsResponse>, AppError> {
    let Json(request) = payload?;
    let ticker = request.ticker.unwrap_or_default();
    debug!(ticker = %ticker, "Insights request");
    let insights = service.insights(&ticker, &request.analysis).await?;
    Ok(Json(InsightsResponse {
        success: true,
        insights,
    }))
}

async fn market_movers(State(service): State<AppState>) -> Json<MoversResponse> {
    Json(MoversResponse::new(
        service.movers(Local::now().date_naive()).await,
    ))
}

async fn market_news(State(service): State<AppState>) -> Json<MarketNewsResponse> {
    Json(MarketNewsResponse::new(service.market_news()))
}

async fn stock_news(
    State(service): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<NewsResponse>, AppError> {
    debug!(ticker = %ticker, "News request");
    Ok(Json(NewsResponse::new(service.news(&ticker).await?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, NaiveDate};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use stockscope::{Analyzer, NewsItem, PriceBar, StaticProvider, Symbol};
    use tower::ServiceExt;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[fixture]
    fn app() -> Router {
        let bars = [100.0, 102.0, 101.0, 104.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar::new(as_of() - Duration::days(3 - i as i64), close, 10))
            .collect();
        let provider = StaticProvider::new()
            .with_attribute("AAPL", "longName", "Apple Inc.")
            .with_attribute("AAPL", "trailingPE", 28.4)
            .with_prices("AAPL", bars)
            .with_news(
                "AAPL",
                vec![NewsItem {
                    title: "Apple unveils new chips".to_string(),
                    publisher: "Reuters".to_string(),
                    ..NewsItem::default()
                }],
            );
        let analyzer = Analyzer::new(Arc::new(provider)).with_as_of(as_of());
        router(Stockscope::with_analyzer(analyzer).with_universe(vec![Symbol::new("AAPL")]))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[tokio::test]
    async fn test_health(app: Router) {
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let (status, body) = send_json(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[rstest]
    #[tokio::test]
    async fn test_analyze(app: Router) {
        let (status, body) =
            send_json(app, post_json("/api/analyze", &json!({"ticker": " aapl "}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["ticker"], json!("AAPL"));
        assert_eq!(body["analysis"]["company_info"]["name"], json!("Apple Inc."));
        assert_eq!(body["historical_data"]["close"].as_array().map(Vec::len), Some(4));
    }

    #[rstest]
    #[case(json!({"ticker": ""}))]
    #[case(json!({}))]
    #[case(json!({"ticker": null}))]
    #[tokio::test]
    async fn test_analyze_requires_ticker(app: Router, #[case] payload: Value) {
        let (status, body) = send_json(app, post_json("/api/analyze", &payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": "Please provide a ticker symbol"})
        );
    }

    #[rstest]
    #[case("/api/analyze", "{\"ticker\": 42}")]
    #[case("/api/compare", "{\"tickers\": \"AAPL\"}")]
    #[case("/api/generate-pdf", "{\"ticker\": \"AAPL\", \"analysis\": \"none\"}")]
    #[case("/api/ai-insights", "not json")]
    #[tokio::test]
    async fn test_malformed_body_is_enveloped(
        app: Router,
        #[case] uri: &str,
        #[case] raw: &'static str,
    ) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        let (status, body) = send_json(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_content_type_is_enveloped(app: Router) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .body(Body::from("{\"ticker\": \"AAPL\"}"))
            .unwrap();
        let (status, body) = send_json(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[rstest]
    #[tokio::test]
    async fn test_analyze_unknown_ticker_is_soft_failure(app: Router) {
        let (status, body) =
            send_json(app, post_json("/api/analyze", &json!({"ticker": "ZZZZ"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Symbol not found: ZZZZ"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_compare(app: Router) {
        let rejected = send_json(
            app.clone(),
            post_json("/api/compare", &json!({"tickers": ["AAPL"]})),
        )
        .await;
        assert_eq!(rejected.0, StatusCode::BAD_REQUEST);
        assert_eq!(
            rejected.1["error"],
            json!("Please provide at least 2 tickers to compare")
        );

        let (status, body) = send_json(
            app,
            post_json("/api/compare", &json!({"tickers": ["AAPL", "BAD$TICKER"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["ticker"], json!("AAPL"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_generate_pdf(app: Router) {
        let payload = json!({
            "ticker": "AAPL",
            "analysis": {"profitability_ratios": {"roic": 0.10}},
            "financial_statements": {}
        });
        let response = app
            .oneshot(post_json("/api/generate-pdf", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"AAPL_analysis_"));
        assert!(disposition.ends_with(".pdf\""));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_generate_pdf_missing_data(app: Router) {
        let (status, body) =
            send_json(app, post_json("/api/generate-pdf", &json!({"ticker": "AAPL"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "error": "Missing data"}));
    }

    #[rstest]
    #[tokio::test]
    async fn test_ai_insights_validation(app: Router) {
        let (status, body) = send_json(
            app.clone(),
            post_json("/api/ai-insights", &json!({"ticker": "AAPL"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Missing ticker or analysis data"));

        let payload = json!({"ticker": "AAPL", "analysis": {"company_info": {"name": "Apple"}}});
        let (status, body) = send_json(app, post_json("/api/ai-insights", &payload)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], json!(false));
    }

    #[rstest]
    #[tokio::test]
    async fn test_market_movers_envelope(app: Router) {
        let request = Request::get("/api/market-movers")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert!(body["gainers"].is_array());
        assert!(body["losers"].is_array());
    }

    #[rstest]
    #[tokio::test]
    async fn test_stock_news(app: Router) {
        let request = Request::get("/api/stock-news/aapl")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["ticker"], json!("AAPL"));
        assert_eq!(
            body["news"],
            json!([{
                "title": "Apple unveils new chips",
                "publisher": "Reuters",
                "link": "#",
                "published": "Unknown date",
                "thumbnail": ""
            }])
        );

        let request = Request::get("/api/stock-news/ZZZZ")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Symbol not found: ZZZZ"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_market_news(app: Router) {
        let request = Request::get("/api/market-news")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["news"].as_array().map(Vec::len), Some(10));
        assert_eq!(body["news"][0], json!("📊 S&P 500 reaches new all-time high"));
    }
}
