use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use store_crud::bus::mock::EventRecorder;
use store_crud::http::{HttpClient, RestClient, TransportError};
use store_crud::lifecycle::{CrudSystem, Settings};
use store_crud::model::{Command, Envelope, EventKind, Owner, Params, Status};
use tokio::net::TcpListener;

const WAIT: Duration = Duration::from_secs(5);

async fn list_notes() -> Json<Value> {
    Json(json!({"status": "ok", "items": [{"id": 1, "title": "first"}]}))
}

/// Answers without a status field.
async fn create_note(Json(payload): Json<Value>) -> Json<Value> {
    Json(json!({"items": [payload]}))
}

async fn update_note(Path(_id): Path<u64>) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn delete_note(Path(_id): Path<u64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn spawn_notes_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/:id", axum::routing::put(update_note).delete(delete_note));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn client() -> RestClient {
    RestClient::new(Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn test_rest_client_verbs() {
    let base = spawn_notes_server().await;
    let client = client();

    let raw = client.get(&format!("{base}/api/notes")).await.unwrap().unwrap();
    assert_eq!(raw.status, Some(Status::Ok));
    assert_eq!(raw.items.unwrap().len(), 1);

    let raw = client
        .post(&format!("{base}/api/notes"), &json!({"title": "second"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw.status, None);
    assert_eq!(raw.items, Some(vec![json!({"title": "second"})]));

    let err = client
        .put(&format!("{base}/api/notes/1"), &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err, TransportError::Status(500));

    let absent = client.delete(&format!("{base}/api/notes/1")).await.unwrap();
    assert_eq!(absent, None);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client().get(&format!("http://{addr}/api/notes")).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "got {err:?}");
    assert!(err.description().is_some());
}

/// The whole stack against a real HTTP server.
#[tokio::test]
async fn test_system_against_http_server() {
    let base = spawn_notes_server().await;
    let settings = Settings {
        base_url: base,
        request_timeout_secs: 5,
        ..Settings::default()
    };
    let system = CrudSystem::connect(&settings).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());
    let notes = Owner::rest("notes", "/api/notes");

    system
        .bus()
        .dispatch(Command::read(notes.clone(), Params::new()))
        .await
        .unwrap();
    let events = recorder.until_terminal(WAIT).await;
    assert_eq!(
        EventRecorder::kinds(&events),
        vec![EventKind::ReadDone, EventKind::DataChanged]
    );

    system
        .bus()
        .dispatch(Command::create(notes.clone(), Params::new(), json!({"title": "x"})))
        .await
        .unwrap();
    let events = recorder.until_terminal(WAIT).await;
    assert_eq!(
        events.last().unwrap().envelope(),
        &Envelope::ok(vec![json!({"title": "x"})])
    );

    let mut params = Params::new();
    params.insert("id".into(), json!(1));
    system
        .bus()
        .dispatch(Command::update(notes.clone(), params, json!({"title": "y"})))
        .await
        .unwrap();
    let events = recorder.until_terminal(WAIT).await;
    assert_eq!(EventRecorder::kinds(&events), vec![EventKind::DataError]);
    assert_eq!(
        events[0].envelope(),
        &Envelope::failure("unexpected status 500")
    );

    system.shutdown().await.unwrap();
}
