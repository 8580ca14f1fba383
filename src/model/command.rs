use super::Owner;
use serde_json::{Map, Value};
use std::fmt;

/// Untyped request parameters, resolved into the URL by a [`UrlBuilder`](crate::http::UrlBuilder).
pub type Params = Map<String, Value>;

/// Routing key for inbound messages. One handler is subscribed per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    New,
    Read,
    Create,
    Update,
    Delete,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::New,
        CommandKind::Read,
        CommandKind::Create,
        CommandKind::Update,
        CommandKind::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::New => "new",
            CommandKind::Read => "read",
            CommandKind::Create => "create",
            CommandKind::Update => "update",
            CommandKind::Delete => "delete",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to act on a remote resource. Built by the caller and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New {
        owner: Owner,
        params: Params,
    },
    Read {
        owner: Owner,
        params: Params,
    },
    Create {
        owner: Owner,
        params: Params,
        payload: Value,
    },
    Update {
        owner: Owner,
        params: Params,
        payload: Value,
    },
    Delete {
        owner: Owner,
        params: Params,
    },
}

impl Command {
    pub fn new(owner: Owner) -> Self {
        Command::New {
            owner,
            params: Params::new(),
        }
    }

    pub fn read(owner: Owner, params: Params) -> Self {
        Command::Read { owner, params }
    }

    pub fn create(owner: Owner, params: Params, payload: Value) -> Self {
        Command::Create {
            owner,
            params,
            payload,
        }
    }

    pub fn update(owner: Owner, params: Params, payload: Value) -> Self {
        Command::Update {
            owner,
            params,
            payload,
        }
    }

    pub fn delete(owner: Owner, params: Params) -> Self {
        Command::Delete { owner, params }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::New { .. } => CommandKind::New,
            Command::Read { .. } => CommandKind::Read,
            Command::Create { .. } => CommandKind::Create,
            Command::Update { .. } => CommandKind::Update,
            Command::Delete { .. } => CommandKind::Delete,
        }
    }

    pub fn owner(&self) -> &Owner {
        match self {
            Command::New { owner, .. }
            | Command::Read { owner, .. }
            | Command::Create { owner, .. }
            | Command::Update { owner, .. }
            | Command::Delete { owner, .. } => owner,
        }
    }

    pub fn params(&self) -> &Params {
        match self {
            Command::New { params, .. }
            | Command::Read { params, .. }
            | Command::Create { params, .. }
            | Command::Update { params, .. }
            | Command::Delete { params, .. } => params,
        }
    }
}

/// A failure that arrives in place of a well-formed [`Command`].
///
/// Handlers never make a network call for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandFailure {
    pub kind: CommandKind,
    pub owner: Owner,
    pub reason: String,
}

impl CommandFailure {
    pub fn new(kind: CommandKind, owner: Owner, reason: impl Into<String>) -> Self {
        Self {
            kind,
            owner,
            reason: reason.into(),
        }
    }
}

/// What a subscribed handler receives from the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Command(Command),
    Failure(CommandFailure),
}

impl Inbound {
    pub fn kind(&self) -> CommandKind {
        match self {
            Inbound::Command(command) => command.kind(),
            Inbound::Failure(failure) => failure.kind,
        }
    }

    pub fn owner(&self) -> &Owner {
        match self {
            Inbound::Command(command) => command.owner(),
            Inbound::Failure(failure) => &failure.owner,
        }
    }
}

impl From<Command> for Inbound {
    fn from(command: Command) -> Self {
        Inbound::Command(command)
    }
}

impl From<CommandFailure> for Inbound {
    fn from(failure: CommandFailure) -> Self {
        Inbound::Failure(failure)
    }
}
