//! End-to-end tests: client -> proxy -> mock remote agent.

use adk_proxy::agent::{CustomerData, FALLBACK_REPLY_TEXT};
use adk_proxy::client::{AdkClient, Session};
use adk_proxy::config::ProxyConfig;
use adk_proxy::server::ProxyServerBuilder;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Requests seen by the mock agent
#[derive(Clone, Default)]
struct Recorded {
    sessions: Arc<Mutex<Vec<(String, String, Value)>>>,
    runs: Arc<Mutex<Vec<Value>>>,
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Spawn a mock agent whose run endpoint answers with `sse_body`
async fn spawn_agent(sse_body: &'static str) -> (String, Recorded) {
    let recorded = Recorded::default();

    async fn create(
        State(recorded): State<Recorded>,
        Path((app, user, session)): Path<(String, String, String)>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        assert_eq!(app, "chair_agent");
        recorded
            .sessions
            .lock()
            .unwrap()
            .push((user.clone(), session.clone(), body));
        (
            StatusCode::OK,
            Json(json!({"id": session, "appName": app, "userId": user, "state": {}})),
        )
    }

    let runs = recorded.runs.clone();
    let app = Router::new()
        .route("/apps/:app/users/:user/sessions/:session", post(create))
        .route(
            "/run_sse",
            post(move |Json(body): Json<Value>| {
                let runs = runs.clone();
                async move {
                    runs.lock().unwrap().push(body);
                    sse_body
                }
            }),
        )
        .with_state(recorded.clone());

    (serve(app).await, recorded)
}

/// Spawn a mock agent that fails every request with `status` and `body`
async fn spawn_failing_agent(status: StatusCode, body: &'static str) -> String {
    let app = Router::new()
        .route(
            "/apps/:app/users/:user/sessions/:session",
            post(move || async move { (status, body) }),
        )
        .route("/run_sse", post(move || async move { (status, body) }));
    serve(app).await
}

async fn spawn_proxy(agent_url: &str) -> String {
    let server = ProxyServerBuilder::new()
        .config(ProxyConfig::default())
        .port(0)
        .agent_url(agent_url)
        .build()
        .unwrap();
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server
            .serve_on(listener, std::future::pending())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_conversation_round_trip() {
    let (agent_url, recorded) = spawn_agent(concat!(
        "data: {\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Let me look...\"}]}}\n\n",
        "data: {\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"This oak chair costs 89 EUR.\"}]}}\n\n",
    ))
    .await;
    let proxy_url = spawn_proxy(&agent_url).await;

    let client = AdkClient::new(&proxy_url);
    let mut session = Session::new("user_123");

    let created = client
        .create_session(
            &mut session,
            CustomerData {
                first_name: Some("Sophie".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(created.success, "{:?}", created.error);
    assert_eq!(created.session_id.as_deref(), session.session_id());

    let reply = client
        .send_message(&mut session, "How much is this?", Some("data:image/jpeg;base64,/9j/4AAQ"))
        .await;
    assert!(reply.success, "{:?}", reply.error);
    assert_eq!(reply.response.unwrap().text(), "This oak chair costs 89 EUR.");

    let sessions = recorded.sessions.lock().unwrap().clone();
    assert_eq!(sessions.len(), 1);
    let (user, session_id, body) = &sessions[0];
    assert_eq!(user, "user_123");
    assert_eq!(Some(session_id.as_str()), session.session_id());
    assert_eq!(body["state"]["first_name"], "Sophie");
    assert_eq!(body["state"]["preferred_language"], "fr");

    let runs = recorded.runs.lock().unwrap().clone();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["app_name"], "chair_agent");
    assert_eq!(runs[0]["streaming"], false);
    assert_eq!(
        runs[0]["new_message"]["parts"],
        json!([
            {"text": "How much is this?"},
            {"inline_data": {"mime_type": "image/jpeg", "data": "/9j/4AAQ"}}
        ])
    );
}

#[tokio::test]
async fn test_send_creates_session_once() {
    let (agent_url, recorded) = spawn_agent(
        "data: {\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"hi\"}]}}\n",
    )
    .await;
    let proxy_url = spawn_proxy(&agent_url).await;

    let client = AdkClient::new(&proxy_url);
    let mut session = Session::new("u");

    for _ in 0..3 {
        let reply = client.send_message(&mut session, "hello", None).await;
        assert!(reply.success);
    }

    assert_eq!(recorded.sessions.lock().unwrap().len(), 1);
    assert_eq!(recorded.runs.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_malformed_sse_falls_back() {
    let (agent_url, _) = spawn_agent("data: {\"content\": oops\n").await;
    let proxy_url = spawn_proxy(&agent_url).await;

    let client = AdkClient::new(&proxy_url);
    let mut session = Session::new("u");

    let reply = client.send_message(&mut session, "hello", None).await;
    assert!(reply.success);
    let content = reply.response.unwrap();
    assert_eq!(content.role, "model");
    assert_eq!(content.text(), FALLBACK_REPLY_TEXT);
}

#[tokio::test]
async fn test_send_message_alias_route() {
    let (agent_url, _) = spawn_agent(
        "data: {\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"alias\"}]}}\n",
    )
    .await;
    let proxy_url = spawn_proxy(&agent_url).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/adk/send_message", proxy_url))
        .json(&json!({
            "app_name": "chair_agent",
            "user_id": "u",
            "session_id": "s",
            "new_message": {"role": "user", "parts": [{"text": "hi"}]},
            "streaming": false
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": true, "response": {"role": "model", "parts": [{"text": "alias"}]}})
    );
}

#[tokio::test]
async fn test_remote_error_status_is_forwarded() {
    let agent_url = spawn_failing_agent(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
    let proxy_url = spawn_proxy(&agent_url).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/adk/create_session", proxy_url))
        .json(&json!({
            "userId": "u",
            "sessionId": "s",
            "state": {
                "customer_id": "u",
                "first_name": "User",
                "last_name": "",
                "email": "",
                "preferred_language": "fr",
                "loyalty_status": "Standard",
                "purchase_history": [],
                "basket": []
            }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("500"));
    assert!(error.contains("boom"));

    // The client surfaces the same error and stays uninitialized
    let client = AdkClient::new(&proxy_url);
    let mut session = Session::new("u");
    let reply = client.send_message(&mut session, "hello", None).await;
    assert!(!reply.success);
    assert_eq!(reply.error.as_deref(), Some("ADK Error: 500 - boom"));
    assert!(!session.is_initialized());
}

#[tokio::test]
async fn test_unreachable_proxy_is_network_error() {
    let client = AdkClient::new("http://127.0.0.1:9");
    let mut session = Session::new("u");

    let created = client.create_session(&mut session, CustomerData::default()).await;
    assert!(!created.success);
    assert!(created.error.unwrap().starts_with("Network error: "));
}
