//! End-to-end flows through the real controller wired to the HTTP adapters,
//! with the backend stood in by a mock server.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use client_lib::adapters::{Backend, HttpAuthAdapter, HttpChatAdapter, HttpProcessingAdapter};
use client_lib::config::Config;
use vibebot_core::controller::{upload_invitation, CHAT_ERROR};
use vibebot_core::{
    AuthMode, AuthOutcome, Controller, Credentials, FileKind, Role, Route, RouteDecision,
    SourceFile,
};

fn controller_for(server: &MockServer) -> Arc<Controller> {
    let config = Config {
        base_url: server.uri().trim_end_matches('/').to_string(),
        log_level: tracing::Level::INFO,
        request_timeout: Duration::from_secs(5),
    };
    let backend = Backend::new(&config).expect("client builds");
    Arc::new(Controller::new(
        Arc::new(HttpAuthAdapter::new(backend.clone())),
        Arc::new(HttpProcessingAdapter::new(backend.clone())),
        Arc::new(HttpChatAdapter::new(backend)),
    ))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok123",
            "username": "alice"
        })))
        .mount(server)
        .await;
}

async fn mount_verify(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/verify-token"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isValid": true,
            "user": { "username": "alice" }
        })))
        .mount(server)
        .await;
}

fn login_credentials() -> Credentials {
    Credentials {
        username: "a@b.com".to_string(),
        email: None,
        password: "secret1".to_string(),
    }
}

#[tokio::test]
async fn login_then_protected_route_allows_without_redirect() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_verify(&server).await;

    let controller = controller_for(&server);
    let outcome = controller
        .authenticate(AuthMode::Login, &login_credentials())
        .await
        .unwrap();
    match outcome {
        AuthOutcome::LoggedIn(session) => {
            assert_eq!(session.token, "tok123");
            assert_eq!(session.username, "alice");
        }
        AuthOutcome::Registered => panic!("expected a login outcome"),
    }

    assert_eq!(
        controller.guard_route(Route::Interact).await,
        RouteDecision::Allow
    );
}

#[tokio::test]
async fn upload_then_ask_resolves_placeholder_with_answer() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/process-pdf"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcript": "Full text...",
            "summary": "Short summary",
            "transcript_id": "tid-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .and(body_json(json!({
            "transcript_id": "tid-1",
            "question": "What is this about?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "It is about X."})))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller
        .authenticate(AuthMode::Login, &login_credentials())
        .await
        .unwrap();

    let file = SourceFile::new("report.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.4"));
    let kind = controller.attach_file(file).await;
    assert_eq!(kind, FileKind::Pdf);

    let conversation = controller.conversation().await;
    assert_eq!(
        conversation.last().unwrap().content,
        upload_invitation("report.pdf")
    );

    let attachment = controller.attachment().await.unwrap();
    assert_eq!(attachment.transcript.as_deref(), Some("Full text..."));
    assert_eq!(attachment.summary.as_deref(), Some("Short summary"));
    assert_eq!(attachment.transcript_id.as_deref(), Some("tid-1"));

    assert!(controller.ask("What is this about?").await);

    let conversation = controller.conversation().await;
    let answer = conversation.last().unwrap();
    assert_eq!(answer.role, Role::Assistant);
    assert_eq!(answer.content, "It is about X.");
    let question = &conversation[conversation.len() - 2];
    assert_eq!(question.role, Role::User);
    assert_eq!(question.content, "What is this about?");
}

#[tokio::test]
async fn chat_failure_replaces_placeholder_with_warning_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/process-pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcript": "Full text...",
            "summary": null,
            "transcript_id": "tid-1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let file = SourceFile::new("report.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.4"));
    controller.attach_file(file).await;

    let before = controller.conversation().await.len();
    assert!(controller.ask("Will this fail?").await);

    let conversation = controller.conversation().await;
    assert_eq!(conversation.len(), before + 2);
    assert_eq!(conversation.last().unwrap().content, CHAT_ERROR);
}
