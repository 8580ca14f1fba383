use crate::model::{Envelope, Inbound};
use async_trait::async_trait;

/// The five command handlers of a store mediator.
///
/// Every handler accepts either a well-formed command or a pre-formed failure and
/// always resolves to an [`Envelope`]. Nothing is ever returned as an error.
#[async_trait]
pub trait Crud: Send + Sync {
    /// Resets the owner's data set to `{init, []}`. No network call.
    async fn create_new(&self, message: Inbound) -> Envelope;

    async fn read(&self, message: Inbound) -> Envelope;

    async fn create(&self, message: Inbound) -> Envelope;

    async fn update(&self, message: Inbound) -> Envelope;

    async fn delete(&self, message: Inbound) -> Envelope;
}
