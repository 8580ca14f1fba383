use super::{Settings, SystemError};
use crate::bus::{BusActor, MixedBus};
use crate::http::{HttpClient, RestClient, TemplateUrlBuilder};
use crate::mediator::{MediatorHandle, StoreCrudService};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running system: one bus and one mediator subscribed to it.
///
/// # Example
///
/// ```ignore
/// let system = CrudSystem::connect(&Settings::load()?).await?;
///
/// let mut events = system.bus().events();
/// system.bus().dispatch(Command::read(owner, Params::new())).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CrudSystem<H: HttpClient + 'static> {
    bus: MixedBus,
    service: Arc<StoreCrudService<H, TemplateUrlBuilder>>,
    mediator: MediatorHandle,
    bus_handle: JoinHandle<()>,
}

impl CrudSystem<RestClient> {
    /// Starts the system against a real REST API described by `settings`.
    pub async fn connect(settings: &Settings) -> Result<Self, SystemError> {
        let http = RestClient::new(settings.request_timeout())?;
        Self::start(settings, http).await
    }
}

impl<H: HttpClient + 'static> CrudSystem<H> {
    /// Starts the bus, then registers the mediator's handlers on it.
    pub async fn start(settings: &Settings, http: H) -> Result<Self, SystemError> {
        let url_builder = TemplateUrlBuilder::parse(&settings.base_url)?;

        let (bus_actor, bus) = BusActor::new(settings.bus_buffer_size, settings.event_capacity);
        let bus_handle = tokio::spawn(bus_actor.run());

        let service = Arc::new(StoreCrudService::new(http, url_builder, bus.publisher()));
        let mediator = service.clone().start(&bus).await?;

        info!(base_url = %settings.base_url, "System started");
        Ok(Self {
            bus,
            service,
            mediator,
            bus_handle,
        })
    }

    pub fn bus(&self) -> &MixedBus {
        &self.bus
    }

    /// The mediator, for callers that want to await an envelope directly.
    pub fn service(&self) -> &Arc<StoreCrudService<H, TemplateUrlBuilder>> {
        &self.service
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the bus handle stops the bus actor, which closes every subscription.
    /// The mediator's listeners then finish their in-flight commands and exit.
    /// Clones of the bus handed out through [`CrudSystem::bus`] must be dropped first,
    /// or this waits for them.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.bus);

        if let Err(e) = self.bus_handle.await {
            error!(error = %e, "Bus task failed");
            return Err(SystemError::Task(e.to_string()));
        }
        self.mediator.join().await?;

        info!("System shutdown complete.");
        Ok(())
    }
}
