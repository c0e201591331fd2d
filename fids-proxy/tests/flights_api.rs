use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;

use fids_proxy::{app, AppState, Configuration};

const TEST_TOKEN: &str = "test-token";

fn sample_board() -> Value {
    json!([
        {
            "FlightNumber": "CI100",
            "AirlineID": "CI",
            "ScheduleDepartureTime": "2024-05-01T08:00:00",
            "EstimatedDepartureTime": "2024-05-01T08:15:00",
            "ScheduleArrivalTime": "2024-05-01T12:00:00",
            "EstimatedArrivalTime": "2024-05-01T12:05:00",
            "ArrivalAirportID": "TPE",
            "DepartureAirportID": "NRT",
            "DepartureRemark": "Departed",
            "ArrivalRemark": "On Time",
            "Terminal": "2",
            "Gate": "A3"
        },
        {
            "FlightNumber": "BR87",
            "AirlineID": "BR",
            "ScheduleDepartureTime": "2024-05-01T09:30:00",
            "ArrivalAirportID": "TPE",
            "Terminal": "1"
        }
    ])
}

#[derive(Clone)]
struct UpstreamState {
    token_requests: Arc<AtomicUsize>,
    board: Arc<Value>,
    fids_status: StatusCode,
    token_status: StatusCode,
}

async fn token_endpoint(State(state): State<UpstreamState>) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    if !state.token_status.is_success() {
        return (state.token_status, "token endpoint down").into_response();
    }

    Json(json!({
        "access_token": TEST_TOKEN,
        "token_type": "bearer",
        "expires_in": 3600
    }))
    .into_response()
}

async fn fids_endpoint(
    State(state): State<UpstreamState>,
    Path((_direction, _airport)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let expected = format!("Bearer {}", TEST_TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing or bad token").into_response();
    }

    if !state.fids_status.is_success() {
        return (state.fids_status, "upstream error").into_response();
    }

    Json(state.board.as_ref().clone()).into_response()
}

struct Upstream {
    addr: SocketAddr,
    token_requests: Arc<AtomicUsize>,
}

async fn spawn_upstream(fids_status: StatusCode, token_status: StatusCode) -> Upstream {
    let token_requests = Arc::new(AtomicUsize::new(0));
    let state = UpstreamState {
        token_requests: token_requests.clone(),
        board: Arc::new(sample_board()),
        fids_status,
        token_status,
    };

    let router = Router::new()
        .route("/token", post(token_endpoint))
        .route(
            "/api/basic/v2/Air/FIDS/Airport/{direction}/{airport}",
            get(fids_endpoint),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock upstream");
    });

    Upstream {
        addr,
        token_requests,
    }
}

fn proxy_app(upstream_addr: SocketAddr) -> Router {
    let configuration: Configuration = serde_json::from_value(json!({
        "tdx": {
            "client_id": "test-client",
            "client_secret": "test-secret",
            "api_url": format!("http://{}/api/basic/v2/Air/FIDS/Airport", upstream_addr),
            "token_url": format!("http://{}/token", upstream_addr),
        }
    }))
    .expect("test configuration");

    let state = AppState::new(&configuration).expect("test app state");
    app(state)
}

/// App whose upstream URLs point nowhere; fine for request validation tests
/// that never leave the proxy.
fn offline_app() -> Router {
    let configuration: Configuration = serde_json::from_value(json!({
        "tdx": {
            "client_id": "test-client",
            "client_secret": "test-secret",
            "api_url": "http://127.0.0.1:9/api/basic/v2/Air/FIDS/Airport",
            "token_url": "http://127.0.0.1:9/token",
        }
    }))
    .expect("test configuration");

    let state = AppState::new(&configuration).expect("test app state");
    app(state)
}

// serde_json's Map iterates keys alphabetically, so field-set checks compare
// sorted key lists.
fn sorted_keys(value: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(|k| k.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let (status, body) = get_json(offline_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn missing_parameters_yield_400() {
    let uris = [
        "/api/flights",
        "/api/flights?Ad=Arrive&Airport=TPE",
        "/api/flights?FlightDate=2024-05-01&Airport=TPE",
        "/api/flights?FlightDate=2024-05-01&Ad=Arrive",
    ];

    for uri in uris {
        let (status, body) = get_json(offline_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body["error"], "Missing required query parameters");
    }
}

#[tokio::test]
async fn invalid_direction_yields_400() {
    let (status, body) = get_json(
        offline_app(),
        "/api/flights?FlightDate=2024-05-01&Ad=Sideways&Airport=TPE",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"].as_str().unwrap().contains("Arrive or Depart"),
        "body: {}",
        body
    );
}

#[tokio::test]
async fn arrive_request_serves_reduced_arrival_board() {
    let upstream = spawn_upstream(StatusCode::OK, StatusCode::OK).await;

    let (status, body) = get_json(
        proxy_app(upstream.addr),
        "/api/flights?FlightDate=2024-05-01&Ad=Arrive&Airport=TPE",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let board = body.as_array().expect("array body");
    assert_eq!(board.len(), 2);

    // Upstream order is preserved
    assert_eq!(board[0]["FlightNumber"], "CI100");
    assert_eq!(board[1]["FlightNumber"], "BR87");

    let mut expected = vec![
        "FlightNumber",
        "AirlineID",
        "ScheduleDepartureTime",
        "EstimatedDepartureTime",
        "ArrivalAirportID",
        "DepartureRemark",
        "Terminal",
    ];
    expected.sort_unstable();
    assert_eq!(sorted_keys(&board[0]), expected);

    // Arrival view never leaks departure-side fields
    assert!(board[0].get("ScheduleArrivalTime").is_none());
    assert!(board[0].get("Gate").is_none());
}

#[tokio::test]
async fn depart_request_serves_reduced_departure_board() {
    let upstream = spawn_upstream(StatusCode::OK, StatusCode::OK).await;

    let (status, body) = get_json(
        proxy_app(upstream.addr),
        "/api/flights?FlightDate=2024-05-01&Ad=Depart&Airport=TPE",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let board = body.as_array().expect("array body");

    let mut expected = vec![
        "FlightNumber",
        "AirlineID",
        "ScheduleArrivalTime",
        "EstimatedArrivalTime",
        "DepartureAirportID",
        "ArrivalRemark",
        "Terminal",
    ];
    expected.sort_unstable();
    assert_eq!(sorted_keys(&board[0]), expected);

    // Second record is missing most optional fields upstream; they come
    // through as nulls rather than disappearing.
    assert!(board[1]["ScheduleArrivalTime"].is_null());
    assert_eq!(board[1]["Terminal"], "1");
}

#[tokio::test]
async fn token_is_fetched_once_across_requests() {
    let upstream = spawn_upstream(StatusCode::OK, StatusCode::OK).await;
    let app = proxy_app(upstream.addr);

    for _ in 0..3 {
        let (status, _) = get_json(
            app.clone(),
            "/api/flights?FlightDate=2024-05-01&Ad=Arrive&Airport=TPE",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(upstream.token_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn upstream_failure_yields_generic_500() {
    let upstream = spawn_upstream(StatusCode::BAD_GATEWAY, StatusCode::OK).await;

    let (status, body) = get_json(
        proxy_app(upstream.addr),
        "/api/flights?FlightDate=2024-05-01&Ad=Arrive&Airport=TPE",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn token_endpoint_failure_surfaces_as_generic_500() {
    // Token exchange fails silently; the upstream call goes out without a
    // bearer token and the 401 comes back as a generic 500.
    let upstream = spawn_upstream(StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR).await;

    let (status, body) = get_json(
        proxy_app(upstream.addr),
        "/api/flights?FlightDate=2024-05-01&Ad=Arrive&Airport=TPE",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
}
