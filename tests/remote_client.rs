use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pulseboard::remote::Platform;
use pulseboard::view::{DashboardInputs, DashboardView, DashboardViewModel, ReportPanel, Selections};
use pulseboard::{
    DashboardQueries, EndpointsConfig, FetchError, HttpConfig, QueryCache, RemoteClient,
    TransportError,
};

#[derive(Clone, Default)]
struct Hits {
    report: Arc<AtomicUsize>,
}

async fn daily_report(State(hits): State<Hits>) -> Json<Value> {
    hits.report.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    Json(json!({
        "data": [
            {"date": "2024-03-02", "platform": "bot", "count": 5},
            {"date": "2024-03-01", "platform": "app", "count": 12}
        ]
    }))
}

async fn daily_summary() -> Json<Value> {
    Json(json!({
        "kpi": {
            "highestApiCountDate": "2024-03-01",
            "lowestApiCountDate": "",
            "appPlatformPercentage": "60",
            "botPlatformPercentage": 40,
            "highestAppPlatformCount": 1520,
            "highestBotPlatformCount": 300,
            "totalAppPlatformCount": 75000,
            "totalBotPlatformCount": 2000
        }
    }))
}

async fn platform_status() -> Json<Value> {
    Json(json!({
        "analytics": {"db_connection": true},
        "notebot": {"botStatus": false}
    }))
}

async fn empty_body() -> &'static str {
    ""
}

async fn null_body() -> &'static str {
    "null"
}

async fn server_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn not_json() -> &'static str {
    "<html>oops</html>"
}

struct Stub {
    base_url: String,
    hits: Hits,
}

async fn spawn_stub() -> Stub {
    let hits = Hits::default();
    let app = Router::new()
        .route("/analytics/daily-report", get(daily_report))
        .route("/analytics/daily-report/summary", get(daily_summary))
        .route("/status", get(platform_status))
        .route("/empty", get(empty_body))
        .route("/null", get(null_body))
        .route("/broken", get(server_error))
        .route("/garbage", get(not_json))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        base_url: format!("http://{}", addr),
        hits,
    }
}

fn client_with(endpoints: EndpointsConfig) -> RemoteClient {
    RemoteClient::new(endpoints, &HttpConfig::default()).unwrap()
}

fn endpoints(base_url: &str) -> EndpointsConfig {
    EndpointsConfig {
        base_url: base_url.to_string(),
        ..EndpointsConfig::default()
    }
}

#[tokio::test]
async fn test_decodes_report_summary_and_status() {
    let stub = spawn_stub().await;
    let client = client_with(endpoints(&stub.base_url));

    let report = client.fetch_daily_report().await.unwrap().unwrap();
    assert_eq!(report.data.len(), 2);
    assert_eq!(report.data[0].platform, Platform::Bot);
    assert_eq!(report.data[1].count, 12);

    let summary = client.fetch_daily_summary().await.unwrap().unwrap();
    assert_eq!(summary.kpi.app_platform_percentage, 60.0);
    assert_eq!(summary.kpi.bot_platform_percentage, 40.0);
    assert!(summary.kpi.lowest_api_count_date.is_none());
    assert_eq!(summary.kpi.total_app_platform_count, 75000);

    let status = client.fetch_platform_status().await.unwrap().unwrap();
    assert!(status.analytics.db_connection);
    assert!(!status.notebot.bot_status);
}

#[tokio::test]
async fn test_empty_and_null_bodies_are_absent() {
    let stub = spawn_stub().await;
    let client = client_with(EndpointsConfig {
        daily_report: "/empty".to_string(),
        platform_status: "/null".to_string(),
        ..endpoints(&stub.base_url)
    });

    assert_eq!(client.fetch_daily_report().await.unwrap(), None);
    assert_eq!(client.fetch_platform_status().await.unwrap(), None);
}

#[tokio::test]
async fn test_server_error_is_transport_status() {
    let stub = spawn_stub().await;
    let client = client_with(EndpointsConfig {
        daily_summary: "/broken".to_string(),
        ..endpoints(&stub.base_url)
    });

    let err = client.fetch_daily_summary().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(500));
    match err {
        FetchError::Transport(TransportError::Status { message, .. }) => {
            assert!(message.contains("database unavailable"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_unexpected() {
    let stub = spawn_stub().await;
    let client = client_with(EndpointsConfig {
        game_scores: "/garbage".to_string(),
        ..endpoints(&stub.base_url)
    });

    let err = client.fetch_game_scores().await.unwrap_err();
    assert!(matches!(err, FetchError::Unexpected(_)));
    assert!(err.to_string().starts_with("An unexpected error occurred"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = client_with(endpoints(&format!("http://127.0.0.1:{}", port)));
    let err = client.fetch_missed_words().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_concurrent_consumers_share_one_request() {
    let stub = spawn_stub().await;
    let queries = DashboardQueries::new(
        client_with(endpoints(&stub.base_url)),
        Arc::new(QueryCache::new()),
    );

    let first = queries.daily_report().unwrap();
    let second = queries.daily_report().unwrap();
    let (a, b) = tokio::join!(first.fetch(), second.fetch());
    assert_eq!(a.unwrap().unwrap().data.len(), 2);
    assert_eq!(b.unwrap().unwrap().data.len(), 2);
    assert_eq!(stub.hits.report.load(Ordering::SeqCst), 1);

    // A later consumer is served from cache.
    let _ = queries.daily_report().unwrap().fetch().await;
    assert_eq!(stub.hits.report.load(Ordering::SeqCst), 1);

    // Refetch goes back to the server and keeps the data visible meanwhile.
    let pending = first.refetch();
    let during = first.snapshot();
    assert!(during.is_refetching);
    assert!(during.data.is_some());
    pending.await.unwrap();
    assert_eq!(stub.hits.report.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_dashboard_renders_from_live_queries() {
    let stub = spawn_stub().await;
    let queries = DashboardQueries::new(
        client_with(endpoints(&stub.base_url)),
        Arc::new(QueryCache::new()),
    );

    let report = queries.daily_report().unwrap();
    let summary = queries.daily_summary().unwrap();
    let status = queries.platform_status().unwrap();
    let _ = tokio::join!(report.fetch(), summary.fetch(), status.fetch());

    let view = DashboardViewModel::new().derive_now(
        DashboardInputs {
            report: &report.snapshot(),
            summary: &summary.snapshot(),
            status: &status.snapshot(),
        },
        Selections::default(),
    );

    let DashboardView::Ready { report, .. } = view else {
        panic!("expected ready view");
    };
    let ReportPanel::Ready(charts) = report else {
        panic!("expected ready report panel");
    };
    assert_eq!(charts.distribution[0].value, 60.0);
    assert_eq!(charts.distribution[1].value, 40.0);
}

#[tokio::test]
async fn test_dashboard_keeps_charts_during_refetch() {
    let stub = spawn_stub().await;
    let queries = DashboardQueries::new(
        client_with(endpoints(&stub.base_url)),
        Arc::new(QueryCache::new()),
    );

    let report = queries.daily_report().unwrap();
    let summary = queries.daily_summary().unwrap();
    let status = queries.platform_status().unwrap();
    let _ = tokio::join!(report.fetch(), summary.fetch(), status.fetch());

    let pending = report.refetch();
    let view = DashboardViewModel::new().derive_now(
        DashboardInputs {
            report: &report.snapshot(),
            summary: &summary.snapshot(),
            status: &status.snapshot(),
        },
        Selections::default(),
    );

    let DashboardView::Ready { report: ReportPanel::Ready(charts), .. } = view else {
        panic!("expected charts while refetching");
    };
    assert!(charts.refreshing);
    assert_eq!(charts.distribution[0].value, 60.0);

    pending.await.unwrap();
    assert!(!report.snapshot().is_refetching);
}
