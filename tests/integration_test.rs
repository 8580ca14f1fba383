use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use store_crud::bus::mock::EventRecorder;
use store_crud::http::mock::MockHttpClient;
use store_crud::http::TransportError;
use store_crud::lifecycle::{CrudSystem, Settings};
use store_crud::mediator::Crud;
use store_crud::model::{
    Command, CommandFailure, CommandKind, Envelope, Event, EventKind, Owner, Params,
};

const BASE: &str = "http://mock.local";
const WAIT: Duration = Duration::from_secs(2);

fn settings() -> Settings {
    Settings {
        base_url: BASE.into(),
        ..Settings::default()
    }
}

fn notes() -> Owner {
    Owner::rest("notes", "/api/notes")
}

fn id_params(id: u64) -> Params {
    let mut params = Params::new();
    params.insert("id".into(), json!(id));
    params
}

/// Commands dispatched through the bus reach the mediator and come back as events.
#[tokio::test]
async fn test_bus_dispatch_round_trip() {
    let http = Arc::new(MockHttpClient::new());
    http.expect_get(format!("{BASE}/api/notes"))
        .return_envelope(Envelope::ok(vec![json!({"id": 1})]));

    let system = CrudSystem::start(&settings(), http.clone()).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());

    let delivered = system
        .bus()
        .dispatch(Command::read(notes(), Params::new()))
        .await
        .unwrap();
    assert_eq!(delivered, 1);

    let events = recorder.until_terminal(WAIT).await;
    assert_eq!(
        EventRecorder::kinds(&events),
        vec![EventKind::ReadDone, EventKind::DataChanged]
    );
    for event in &events {
        assert_eq!(event.owner(), &notes());
        assert_eq!(event.envelope(), &Envelope::ok(vec![json!({"id": 1})]));
    }

    http.verify();
    system.shutdown().await.unwrap();
}

/// A failure routed through the bus publishes nothing and makes no request.
#[tokio::test]
async fn test_bus_failure_is_silent() {
    let http = Arc::new(MockHttpClient::new());
    http.expect_delete(format!("{BASE}/api/notes/2")).return_none();

    let system = CrudSystem::start(&settings(), http.clone()).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());

    system
        .bus()
        .dispatch(CommandFailure::new(CommandKind::Delete, notes(), "form invalid"))
        .await
        .unwrap();
    // Only the well-formed command below may produce events or requests.
    system
        .bus()
        .dispatch(Command::delete(notes(), id_params(2)))
        .await
        .unwrap();

    let events = recorder.until_terminal(WAIT).await;
    assert_eq!(
        EventRecorder::kinds(&events),
        vec![EventKind::DeleteDone, EventKind::DataError]
    );
    assert_eq!(http.requests().len(), 1);

    system.shutdown().await.unwrap();
}

/// Completion events always precede the terminal event of the same command, even
/// when several commands are in flight and finish out of order.
#[tokio::test]
async fn test_ordering_under_concurrency() {
    let http = Arc::new(MockHttpClient::new());
    http.expect_put(format!("{BASE}/api/notes/1"))
        .after(Duration::from_millis(150))
        .return_envelope(Envelope::ok(vec![json!({"id": 1})]));
    http.expect_put(format!("{BASE}/api/notes/2"))
        .after(Duration::from_millis(10))
        .return_envelope(Envelope::ok(vec![json!({"id": 2})]));
    http.expect_post(format!("{BASE}/api/notes"))
        .after(Duration::from_millis(60))
        .return_err(TransportError::Timeout);

    let system = CrudSystem::start(&settings(), http.clone()).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());

    let bus = system.bus();
    bus.dispatch(Command::update(notes(), id_params(1), json!({"title": "one"})))
        .await
        .unwrap();
    bus.dispatch(Command::update(notes(), id_params(2), json!({"title": "two"})))
        .await
        .unwrap();
    bus.dispatch(Command::create(notes(), Params::new(), json!({"title": "three"})))
        .await
        .unwrap();

    // Two updates give two events each, the failed create gives one.
    let mut events = Vec::new();
    for _ in 0..5 {
        events.push(recorder.next(WAIT).await);
    }

    // The fastest request finishes first.
    assert!(matches!(&events[0], Event::UpdateDone { params, .. } if params == &id_params(2)));
    assert!(matches!(&events[1], Event::DataChanged { envelope, .. } if envelope.items == vec![json!({"id": 2})]));
    assert!(matches!(&events[2], Event::DataError { envelope, .. } if envelope == &Envelope::failure("timeout")));
    assert!(matches!(&events[3], Event::UpdateDone { params, .. } if params == &id_params(1)));
    assert!(matches!(&events[4], Event::DataChanged { envelope, .. } if envelope.items == vec![json!({"id": 1})]));
    assert!(!events.iter().any(|e| e.kind() == EventKind::CreateDone));

    http.verify();
    system.shutdown().await.unwrap();
}

/// Shutdown waits for commands that are already in flight.
#[tokio::test]
async fn test_shutdown_drains_in_flight_commands() {
    let http = Arc::new(MockHttpClient::new());
    http.expect_get(format!("{BASE}/api/notes"))
        .after(Duration::from_millis(100))
        .return_envelope(Envelope::ok(vec![]));

    let system = CrudSystem::start(&settings(), http.clone()).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());

    system
        .bus()
        .dispatch(Command::read(notes(), Params::new()))
        .await
        .unwrap();
    system.shutdown().await.unwrap();

    let events = recorder.drain();
    assert_eq!(
        EventRecorder::kinds(&events),
        vec![EventKind::ReadDone, EventKind::DataChanged]
    );
    http.verify();
}

/// Callers can bypass the bus and await the envelope directly; events still fire.
#[tokio::test]
async fn test_direct_call_returns_envelope() {
    let http = Arc::new(MockHttpClient::new());
    http.expect_post(format!("{BASE}/api/notes"))
        .return_envelope(Envelope::ok(vec![json!({"id": 5, "title": "new"})]));

    let system = CrudSystem::start(&settings(), http.clone()).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());

    let envelope = system
        .service()
        .create(Command::create(notes(), Params::new(), json!({"title": "new"})).into())
        .await;
    assert_eq!(envelope.items, vec![json!({"id": 5, "title": "new"})]);

    let events = recorder.drain();
    assert_eq!(
        EventRecorder::kinds(&events),
        vec![EventKind::CreateDone, EventKind::DataChanged]
    );

    system.shutdown().await.unwrap();
}

/// New never touches the network and publishes exactly one init change.
#[tokio::test]
async fn test_new_resets_data() {
    let http = Arc::new(MockHttpClient::new());
    let system = CrudSystem::start(&settings(), http.clone()).await.unwrap();
    let mut recorder = EventRecorder::new(system.bus().events());

    system.bus().dispatch(Command::new(notes())).await.unwrap();

    let event = recorder.next(WAIT).await;
    assert_eq!(
        event,
        Event::DataChanged {
            owner: notes(),
            envelope: Envelope::init()
        }
    );

    system.shutdown().await.unwrap();
    assert!(recorder.drain().is_empty());
    assert!(http.requests().is_empty());
}
