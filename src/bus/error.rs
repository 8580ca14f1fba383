/// Errors that can occur within the bus itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BusError {
    #[error("Bus closed")]
    BusClosed,
    #[error("Bus dropped response channel")]
    BusDropped,
}
