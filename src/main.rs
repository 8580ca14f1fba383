//! Demo binary: wires the mediator against the configured REST API, resets and reads
//! one resource group, and logs every event that comes back.

use serde_json::json;
use std::time::Duration;
use store_crud::lifecycle::{setup_tracing, CrudSystem, Settings, SystemError};
use store_crud::model::{Command, Event, Owner, Params};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    setup_tracing();

    let settings = Settings::load()?;
    info!(base_url = %settings.base_url, "Starting store-crud");

    let system = CrudSystem::connect(&settings).await?;
    let mut events = system.bus().events();
    let notes = Owner::rest("notes", "/api/notes");

    let span = tracing::info_span!("notes_sync");
    async {
        let mut params = Params::new();
        params.insert("limit".into(), json!(20));

        system.bus().dispatch(Command::new(notes.clone())).await?;
        system
            .bus()
            .dispatch(Command::read(notes.clone(), params))
            .await?;
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await?;

    // One terminal event for New, one for Read.
    let wait = settings.request_timeout() + Duration::from_secs(1);
    let mut terminal = 0;
    while terminal < 2 {
        match tokio::time::timeout(wait, events.recv()).await {
            Ok(Ok(event)) => {
                if event.is_terminal() {
                    terminal += 1;
                }
                log_event(&event);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Event stream failed");
                break;
            }
            Err(_) => {
                warn!("Timed out waiting for events");
                break;
            }
        }
    }

    drop(events);
    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}

fn log_event(event: &Event) {
    let envelope = event.envelope();
    match event {
        Event::DataError { .. } => warn!(
            owner = %event.owner(),
            items = ?envelope.items,
            "Data error"
        ),
        _ => info!(
            owner = %event.owner(),
            kind = ?event.kind(),
            status = ?envelope.status,
            items = envelope.items.len(),
            "Event"
        ),
    }
}
