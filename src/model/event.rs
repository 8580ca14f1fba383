use super::{Envelope, Owner, Params};

/// Discriminant of [`Event`], handy for filtering subscriber streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ReadDone,
    CreateDone,
    UpdateDone,
    DeleteDone,
    DataChanged,
    DataError,
}

/// An outbound notification published by the mediator. Fire-and-forget.
///
/// The `*Done` events report that a remote call answered; `DataChanged` and
/// `DataError` are the terminal events for every command.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ReadDone {
        owner: Owner,
        envelope: Envelope,
        params: Params,
    },
    CreateDone {
        owner: Owner,
        envelope: Envelope,
    },
    UpdateDone {
        owner: Owner,
        envelope: Envelope,
        params: Params,
    },
    DeleteDone {
        owner: Owner,
        envelope: Envelope,
        params: Params,
    },
    DataChanged {
        owner: Owner,
        envelope: Envelope,
    },
    DataError {
        owner: Owner,
        envelope: Envelope,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ReadDone { .. } => EventKind::ReadDone,
            Event::CreateDone { .. } => EventKind::CreateDone,
            Event::UpdateDone { .. } => EventKind::UpdateDone,
            Event::DeleteDone { .. } => EventKind::DeleteDone,
            Event::DataChanged { .. } => EventKind::DataChanged,
            Event::DataError { .. } => EventKind::DataError,
        }
    }

    pub fn owner(&self) -> &Owner {
        match self {
            Event::ReadDone { owner, .. }
            | Event::CreateDone { owner, .. }
            | Event::UpdateDone { owner, .. }
            | Event::DeleteDone { owner, .. }
            | Event::DataChanged { owner, .. }
            | Event::DataError { owner, .. } => owner,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Event::ReadDone { envelope, .. }
            | Event::CreateDone { envelope, .. }
            | Event::UpdateDone { envelope, .. }
            | Event::DeleteDone { envelope, .. }
            | Event::DataChanged { envelope, .. }
            | Event::DataError { envelope, .. } => envelope,
        }
    }

    /// `true` for `DataChanged` and `DataError`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::DataChanged { .. } | Event::DataError { .. })
    }
}
