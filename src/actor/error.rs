use std::fmt;

use uuid::Uuid;

#[derive(Debug)]
pub enum Error {
    SessionClosed(Uuid),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SessionClosed(id) => write!(f, "session {id} is closed"),
        }
    }
}

impl std::error::Error for Error {}
