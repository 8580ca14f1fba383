//! # Store CRUD Service
//!
//! ## Message Flow
//!
//! ```text
//! Inbound ─► handler ─► UrlBuilder ─► HttpClient ─► *Done event ─► finalize ─► DataChanged / DataError
//!                │                                                     │
//!                └─ Failure: {error, []}, nothing published            └─► returned Envelope
//! ```
//!
//! For one command the `*Done` event is always published before its terminal event,
//! because both are published from the same task in that order.

use super::{Crud, MediatorError};
use crate::bus::{MixedBus, Publisher, Subscription};
use crate::http::{HttpClient, TransportResult, UrlBuilder};
use crate::model::{
    Command, CommandKind, Envelope, Event, Inbound, Owner, Params, Status, UNKNOWN_ERROR,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument, warn};

/// Mediates between bus commands and a REST resource API.
///
/// The service owns no bus. It publishes through a [`Publisher`] and receives commands
/// through the subscriptions made in [`StoreCrudService::start`]. Its handlers can
/// also be called directly (see [`Crud`]), which is how callers await a result.
pub struct StoreCrudService<H, U> {
    http: H,
    url_builder: U,
    publisher: Publisher,
    registered: AtomicBool,
}

impl<H, U> StoreCrudService<H, U>
where
    H: HttpClient + 'static,
    U: UrlBuilder + 'static,
{
    pub fn new(http: H, url_builder: U, publisher: Publisher) -> Self {
        Self {
            http,
            url_builder,
            publisher,
            registered: AtomicBool::new(false),
        }
    }

    /// Subscribes one handler per command kind and starts listening.
    ///
    /// Each inbound message is handled in its own task. Allowed once per instance.
    pub async fn start(self: Arc<Self>, bus: &MixedBus) -> Result<MediatorHandle, MediatorError> {
        if self.registered.swap(true, Ordering::SeqCst) {
            return Err(MediatorError::AlreadyRegistered);
        }
        info!("Start RESTful CRUD events service");

        let mut listeners = Vec::with_capacity(CommandKind::ALL.len());
        for kind in CommandKind::ALL {
            match bus.subscribe(kind).await {
                Ok(subscription) => listeners.push(tokio::spawn(self.clone().listen(subscription))),
                Err(e) => {
                    warn!(%kind, error = %e, "Registration failed");
                    // Undo the partial registration so the instance can be started again.
                    for listener in &listeners {
                        listener.abort();
                    }
                    self.registered.store(false, Ordering::SeqCst);
                    return Err(e.into());
                }
            }
        }
        Ok(MediatorHandle { listeners })
    }

    async fn listen(self: Arc<Self>, mut subscription: Subscription) {
        let kind = subscription.kind();
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                message = subscription.recv() => match message {
                    Some(message) => {
                        let service = self.clone();
                        in_flight.spawn(async move {
                            service.handle(kind, message).await;
                        });
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!(%kind, error = %e, "Handler task failed");
                    }
                }
            }
        }

        // In-flight commands always run to completion.
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(%kind, error = %e, "Handler task failed");
            }
        }
        debug!(%kind, "Listener stopped");
    }

    /// Routes a message to the handler registered for `kind`.
    pub async fn handle(&self, kind: CommandKind, message: Inbound) -> Envelope {
        match kind {
            CommandKind::New => self.create_new(message).await,
            CommandKind::Read => self.read(message).await,
            CommandKind::Create => self.create(message).await,
            CommandKind::Update => self.update(message).await,
            CommandKind::Delete => self.delete(message).await,
        }
    }

    pub async fn query_read(&self, owner: &Owner, params: &Params) -> TransportResult {
        let url = self.url_builder.build(&owner.schema.read, params)?;
        debug!(%url, "GET");
        self.http.get(&url).await
    }

    pub async fn query_create(&self, payload: &Value, owner: &Owner, params: &Params) -> TransportResult {
        let url = self.url_builder.build(&owner.schema.create, params)?;
        debug!(%url, "POST");
        self.http.post(&url, payload).await
    }

    pub async fn query_update(&self, payload: &Value, owner: &Owner, params: &Params) -> TransportResult {
        let url = self.url_builder.build(&owner.schema.update, params)?;
        debug!(%url, "PUT");
        self.http.put(&url, payload).await
    }

    pub async fn query_delete(&self, owner: &Owner, params: &Params) -> TransportResult {
        let url = self.url_builder.build(&owner.schema.delete, params)?;
        debug!(%url, "DELETE");
        self.http.delete(&url).await
    }

    /// Normalizes a call outcome and publishes the matching terminal event.
    ///
    /// - `Err` becomes `{error, [{"message": ...}]}`.
    /// - An absent body becomes `{error, []}`.
    /// - A missing `status` means `ok`, missing `items` mean `[]`.
    ///
    /// `ok` publishes `DataChanged`, `error` publishes `DataError`, anything else publishes nothing.
    fn finalize(&self, outcome: TransportResult, owner: &Owner) -> Envelope {
        let envelope = match outcome {
            Ok(raw) => Envelope::normalize(raw),
            Err(e) => {
                warn!(%owner, error = %e, "Request failed");
                Envelope::failure(e.description().unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
            }
        };

        match envelope.status {
            Status::Ok => self.publisher.publish(Event::DataChanged {
                owner: owner.clone(),
                envelope: envelope.clone(),
            }),
            Status::Error => self.publisher.publish(Event::DataError {
                owner: owner.clone(),
                envelope: envelope.clone(),
            }),
            Status::Init | Status::Other => {
                debug!(%owner, status = ?envelope.status, "No terminal event for status")
            }
        }
        info!(%owner, status = ?envelope.status, items = envelope.items.len(), "Finalized");
        envelope
    }

    /// Publishes the completion event if the call answered at all.
    fn complete(&self, outcome: &TransportResult, done: impl FnOnce(Envelope) -> Event) {
        if let Ok(raw) = outcome {
            self.publisher.publish(done(Envelope::normalize(raw.clone())));
        }
    }

    /// Short-circuit for failures and for commands sent to the wrong handler.
    fn reject(&self, expected: CommandKind, message: Inbound) -> Envelope {
        match message {
            Inbound::Failure(failure) => {
                debug!(owner = %failure.owner, kind = %failure.kind, reason = %failure.reason, "Command failure");
            }
            Inbound::Command(command) => {
                warn!(owner = %command.owner(), %expected, got = %command.kind(), "Command sent to wrong handler");
            }
        }
        Envelope::empty_error()
    }
}

#[async_trait]
impl<H, U> Crud for StoreCrudService<H, U>
where
    H: HttpClient + 'static,
    U: UrlBuilder + 'static,
{
    #[instrument(skip_all, fields(owner = %message.owner()))]
    async fn create_new(&self, message: Inbound) -> Envelope {
        let owner = message.owner().clone();
        let envelope = Envelope::init();
        self.publisher.publish(Event::DataChanged {
            owner: owner.clone(),
            envelope: envelope.clone(),
        });
        self.finalize(Ok(Some(envelope.into())), &owner)
    }

    #[instrument(skip_all, fields(owner = %message.owner()))]
    async fn read(&self, message: Inbound) -> Envelope {
        let (owner, params) = match message {
            Inbound::Command(Command::Read { owner, params }) => (owner, params),
            other => return self.reject(CommandKind::Read, other),
        };

        let outcome = self.query_read(&owner, &params).await;
        self.complete(&outcome, |envelope| Event::ReadDone {
            owner: owner.clone(),
            envelope,
            params,
        });
        self.finalize(outcome, &owner)
    }

    #[instrument(skip_all, fields(owner = %message.owner()))]
    async fn create(&self, message: Inbound) -> Envelope {
        let (owner, params, payload) = match message {
            Inbound::Command(Command::Create {
                owner,
                params,
                payload,
            }) => (owner, params, payload),
            other => return self.reject(CommandKind::Create, other),
        };

        let outcome = self.query_create(&payload, &owner, &params).await;
        self.complete(&outcome, |envelope| Event::CreateDone {
            owner: owner.clone(),
            envelope,
        });
        self.finalize(outcome, &owner)
    }

    #[instrument(skip_all, fields(owner = %message.owner()))]
    async fn update(&self, message: Inbound) -> Envelope {
        let (owner, params, payload) = match message {
            Inbound::Command(Command::Update {
                owner,
                params,
                payload,
            }) => (owner, params, payload),
            other => return self.reject(CommandKind::Update, other),
        };

        let outcome = self.query_update(&payload, &owner, &params).await;
        self.complete(&outcome, |envelope| Event::UpdateDone {
            owner: owner.clone(),
            envelope,
            params,
        });
        self.finalize(outcome, &owner)
    }

    #[instrument(skip_all, fields(owner = %message.owner()))]
    async fn delete(&self, message: Inbound) -> Envelope {
        let (owner, params) = match message {
            Inbound::Command(Command::Delete { owner, params }) => (owner, params),
            other => return self.reject(CommandKind::Delete, other),
        };

        let outcome = self.query_delete(&owner, &params).await;
        self.complete(&outcome, |envelope| Event::DeleteDone {
            owner: owner.clone(),
            envelope,
            params,
        });
        self.finalize(outcome, &owner)
    }
}

/// Listener tasks started by [`StoreCrudService::start`].
///
/// Listeners stop once the bus shuts down, after their in-flight commands finish.
pub struct MediatorHandle {
    listeners: Vec<JoinHandle<()>>,
}

impl MediatorHandle {
    /// Waits for every listener to stop.
    pub async fn join(self) -> Result<(), MediatorError> {
        for listener in self.listeners {
            listener
                .await
                .map_err(|e| MediatorError::Listener(e.to_string()))?;
        }
        Ok(())
    }
}
