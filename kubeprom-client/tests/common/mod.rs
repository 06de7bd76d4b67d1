use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request as seen by the mock server
#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct Recorded {
    pub path: String,
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<Recorded>>,
}

/// In-process stand-in for a Prometheus server.
///
/// `/query` and `/query_range` echo the received query back as a label so
/// tests can assert on it. Queries starting with `bad(` are rejected the way Prometheus
/// rejects a parse error.
pub struct MockPrometheus {
    pub url: String,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockPrometheus {
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

pub async fn spawn_mock_prometheus() -> MockPrometheus {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/api/v1/query", get(query))
        .route("/api/v1/query_range", get(query_range))
        .route("/api/v1/label/:name/values", get(label_values))
        .route("/api/v1/targets", get(targets))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockPrometheus {
        url: format!("http://{}", addr),
        state,
    }
}

fn record(state: &MockState, path: &str, headers: &HeaderMap, params: HashMap<String, String>) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(Recorded {
        path: path.to_string(),
        params,
        authorization,
    });
}

fn parse_error(query: &str) -> Option<(StatusCode, Json<Value>)> {
    if query.starts_with("bad(") {
        return Some((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "1:5: parse error: unclosed left parenthesis"
            })),
        ));
    }
    None
}

async fn query(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let q = params.get("query").cloned().unwrap_or_default();
    record(&state, "/api/v1/query", &headers, params);
    if let Some(err) = parse_error(&q) {
        return err;
    }
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [{"metric": {"query": q}, "value": [1700000000.0, "1"]}]
            }
        })),
    )
}

async fn query_range(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let q = params.get("query").cloned().unwrap_or_default();
    record(&state, "/api/v1/query_range", &headers, params);
    if let Some(err) = parse_error(&q) {
        return err;
    }
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "data": {
                "resultType": "matrix",
                "result": [{
                    "metric": {"query": q},
                    "values": [[1700000000.0, "0.5"], [1700000015.0, "0.75"]]
                }]
            },
            "warnings": ["range was clamped"]
        })),
    )
}

async fn label_values(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Json<Value> {
    record(
        &state,
        &format!("/api/v1/label/{}/values", name),
        &headers,
        HashMap::new(),
    );
    let values = match name.as_str() {
        "namespace" => json!(["default", "kube-system"]),
        _ => json!([]),
    };
    Json(json!({"status": "success", "data": values}))
}

async fn targets(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    record(&state, "/api/v1/targets", &headers, HashMap::new());
    Json(json!({
        "status": "success",
        "data": {
            "activeTargets": [{
                "discoveredLabels": {"__address__": "node-1:10250"},
                "labels": {"job": "kubernetes-cadvisor", "instance": "node-1"},
                "scrapePool": "kubernetes-cadvisor",
                "scrapeUrl": "https://node-1:10250/metrics/cadvisor",
                "lastError": "",
                "lastScrape": "2024-01-01T00:00:00Z",
                "lastScrapeDuration": 0.042,
                "health": "up"
            }],
            "droppedTargets": []
        }
    }))
}
