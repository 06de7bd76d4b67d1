use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Prometheus stand-in for driving the `kubeprom` binary.
///
/// It runs on its own thread and runtime, so blocking `assert_cmd` tests can
/// talk to it. `/api/v1/query` echoes the received query back as a label.
pub struct MockPrometheus {
    pub url: String,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockPrometheus {
    /// Queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

pub fn spawn_mock_prometheus() -> MockPrometheus {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/v1/query", get(query))
        .with_state(queries.clone());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    MockPrometheus {
        url: format!("http://{}", addr),
        queries,
    }
}

async fn query(
    State(queries): State<Arc<Mutex<Vec<String>>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let q = params.get("query").cloned().unwrap_or_default();
    queries.lock().unwrap().push(q.clone());
    Json(json!({
        "status": "success",
        "data": {
            "resultType": "vector",
            "result": [{"metric": {"query": q}, "value": [1700000000.0, "1"]}]
        }
    }))
}
