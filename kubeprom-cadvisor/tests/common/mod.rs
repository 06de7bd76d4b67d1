use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Path and query parameters of a request the mock received
#[derive(Clone, Debug)]
pub struct Recorded {
    pub path: String,
    pub params: HashMap<String, String>,
}

type Requests = Arc<Mutex<Vec<Recorded>>>;

/// Records what the decorated client sends. `/query` and `/query_range`
/// answer with a single series; a query starting with `bad(` gets the error
/// envelope Prometheus uses for parse errors.
pub struct MockPrometheus {
    pub url: String,
    requests: Requests,
}

impl MockPrometheus {
    pub fn last_request(&self) -> Recorded {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

pub async fn spawn_mock_prometheus() -> MockPrometheus {
    let requests = Requests::default();
    let app = Router::new()
        .route("/api/v1/query", get(query))
        .route("/api/v1/query_range", get(query_range))
        .route("/api/v1/label/:name/values", get(label_values))
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockPrometheus {
        url: format!("http://{}", addr),
        requests,
    }
}

fn respond(
    requests: &Requests,
    path: &str,
    params: HashMap<String, String>,
    data: Value,
) -> (StatusCode, Json<Value>) {
    let bad = params
        .get("query")
        .is_some_and(|q| q.starts_with("bad("));
    requests.lock().unwrap().push(Recorded {
        path: path.to_string(),
        params,
    });
    if bad {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "errorType": "bad_data",
                "error": "1:5: parse error: unclosed left parenthesis"
            })),
        );
    }
    (StatusCode::OK, Json(json!({"status": "success", "data": data})))
}

async fn query(
    State(requests): State<Requests>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let data = json!({
        "resultType": "vector",
        "result": [{"metric": {}, "value": [1700000000.0, "1"]}]
    });
    respond(&requests, "/api/v1/query", params, data)
}

async fn query_range(
    State(requests): State<Requests>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let data = json!({
        "resultType": "matrix",
        "result": [{"metric": {}, "values": [[1700000000.0, "0.5"]]}]
    });
    respond(&requests, "/api/v1/query_range", params, data)
}

async fn label_values(
    State(requests): State<Requests>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    let values = match name.as_str() {
        "namespace" => json!(["default", "kube-system"]),
        _ => json!([]),
    };
    let path = format!("/api/v1/label/{}/values", name);
    respond(&requests, &path, HashMap::new(), values)
}
