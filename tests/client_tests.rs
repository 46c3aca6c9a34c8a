use chef_chat::client::{
    ChatClient, ChatLog, ChatTransport, ClientError, EMPTY_REPLY_FALLBACK, FORBIDDEN_MESSAGE,
    HttpReply, HttpTransport, RenderedReply, TurnState,
};
use chef_chat::routes::create_router;
use chef_chat::services::generator::{EchoGenerator, FailingGenerator, Generator, ProviderError};
use chef_chat::state::AppState;

use async_trait::async_trait;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Echoes, but takes its time over anything starting with "slow".
#[derive(Debug)]
struct SlowEchoGenerator;

#[async_trait]
impl Generator for SlowEchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if prompt.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        Ok(prompt.to_string())
    }
}

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_chat_server(generator: impl Generator + 'static) -> ChatClient<HttpTransport> {
    let addr = spawn_server(create_router().with_state(AppState::shared(generator))).await;
    ChatClient::new(HttpTransport::new(format!("http://{addr}")))
}

async fn spawn_status_server(status: StatusCode) -> ChatClient<HttpTransport> {
    let app = Router::new().route("/api/chat", post(move || async move { status }));
    let addr = spawn_server(app).await;
    ChatClient::new(HttpTransport::new(format!("http://{addr}/")))
}

/// Plays back canned answers and counts calls.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpReply, ClientError>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<HttpReply, ClientError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post_chat(&self, _message: &str) -> Result<HttpReply, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted reply".to_string())))
    }
}

#[tokio::test]
async fn echo_round_trip_renders_message_unchanged() {
    let client = spawn_chat_server(EchoGenerator).await;
    let mut log = ChatLog::new();

    let id = client.submit(&mut log, "hello").await.unwrap();

    let turn = log.get(id).unwrap();
    assert_eq!(turn.user, "hello");
    match &turn.reply {
        TurnState::Success(reply) => {
            assert_eq!(reply.to_string(), "hello");
            assert_eq!(reply.to_html(), "hello");
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn multi_line_reply_gets_line_breaks() {
    let client = spawn_chat_server(EchoGenerator).await;
    let mut log = ChatLog::new();

    let id = client.submit(&mut log, "line1\nline2").await.unwrap();

    let TurnState::Success(reply) = &log.get(id).unwrap().reply else {
        panic!("expected success");
    };
    assert_eq!(reply, &RenderedReply::new("line1\nline2"));
    let html = reply.to_html();
    assert_eq!(html, "line1<br>line2");
    assert!(!html.contains('\n'));
}

#[tokio::test]
async fn server_failure_shows_api_error() {
    let client = spawn_chat_server(FailingGenerator).await;
    let mut log = ChatLog::new();

    let id = client.submit(&mut log, "hello").await.unwrap();

    assert_eq!(
        log.get(id).unwrap().reply,
        TurnState::Failure("API error: 500".to_string())
    );
}

#[tokio::test]
async fn forbidden_status_has_fixed_message() {
    let client = spawn_status_server(StatusCode::FORBIDDEN).await;
    let err = client.fetch("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Forbidden));
    assert_eq!(err.to_string(), FORBIDDEN_MESSAGE);
}

#[tokio::test]
async fn unavailable_status_is_generic() {
    let client = spawn_status_server(StatusCode::SERVICE_UNAVAILABLE).await;
    let mut log = ChatLog::new();

    let id = client.submit(&mut log, "hello").await.unwrap();

    assert_eq!(
        log.get(id).unwrap().reply,
        TurnState::Failure("API error: 503".to_string())
    );
}

#[tokio::test]
async fn unreachable_server_shows_the_error_text() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ChatClient::new(HttpTransport::new(format!("http://{addr}")));
    let mut log = ChatLog::new();
    let id = client.submit(&mut log, "hello").await.unwrap();

    match &log.get(id).unwrap().reply {
        TurnState::Failure(msg) => assert!(!msg.is_empty()),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(log.get(id).unwrap().reply_html().contains("text-red-400"));
}

#[tokio::test]
async fn blank_input_sends_nothing() {
    let transport = ScriptedTransport::default();
    let client = ChatClient::new(&transport);
    let mut log = ChatLog::new();

    assert!(client.submit(&mut log, "").await.is_none());
    assert!(client.submit(&mut log, "  \t\n ").await.is_none());

    assert!(log.is_empty());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failures_do_not_block_later_turns() {
    let transport = ScriptedTransport::new(vec![
        Ok(HttpReply::new(503, "")),
        Err(ClientError::Network("connection refused".to_string())),
        Ok(HttpReply::new(200, r#"{"reply":"Voila! Toast."}"#)),
    ]);
    let client = ChatClient::new(&transport);
    let mut log = ChatLog::new();

    let first = client.submit(&mut log, "one").await.unwrap();
    let second = client.submit(&mut log, "two").await.unwrap();
    let third = client.submit(&mut log, "three").await.unwrap();

    assert_eq!(log.len(), 3);
    assert_eq!(
        log.get(first).unwrap().reply,
        TurnState::Failure("API error: 503".to_string())
    );
    assert_eq!(
        log.get(second).unwrap().reply,
        TurnState::Failure("connection refused".to_string())
    );
    assert_eq!(
        log.get(third).unwrap().reply,
        TurnState::Success(RenderedReply::new("Voila! Toast."))
    );
    assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn overlapping_turns_settle_independently() {
    let client = spawn_chat_server(SlowEchoGenerator).await;
    let mut log = ChatLog::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    for input in ["slow soup", "quick toast"] {
        let pending = log.start(input).unwrap();
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(client.complete(pending).await);
        });
    }
    drop(tx);

    let slow = log.turns()[0].clone();
    assert_eq!(slow.reply, TurnState::Sending);

    // Replies are applied in the order they arrive.
    let mut arrived = Vec::new();
    while let Some(settled) = rx.recv().await {
        arrived.push(log.get(settled.id).unwrap().user.clone());
        assert!(log.settle(settled));
    }

    assert_eq!(arrived, ["quick toast", "slow soup"]);
    assert_eq!(
        log.turns()[0].reply,
        TurnState::Success(RenderedReply::new("slow soup"))
    );
    assert_eq!(
        log.turns()[1].reply,
        TurnState::Success(RenderedReply::new("quick toast"))
    );
}

#[tokio::test]
async fn empty_reply_shows_fallback() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { axum::Json(serde_json::json!({ "reply": "" })) }),
    );
    let addr = spawn_server(app).await;
    let client = ChatClient::new(HttpTransport::new(format!("http://{addr}")));
    let mut log = ChatLog::new();

    let id = client.submit(&mut log, "hello").await.unwrap();

    assert_eq!(
        log.get(id).unwrap().reply,
        TurnState::Success(RenderedReply::new(EMPTY_REPLY_FALLBACK))
    );
}
