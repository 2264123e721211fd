use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("timer already started, call reset() before calling start() again")]
    AlreadyStarted,
    #[error("timer already stopped, call reset() before calling stop() again")]
    AlreadyStopped,
    #[error("call start() before calling {operation}")]
    NotStarted { operation: &'static str },
    #[error("call start() before calling mark(\"{id}\")")]
    MarkBeforeStart { id: String },
    #[error("a mark with the id of \"{id}\" does not exist")]
    MarkNotFound { id: String },
    #[error("no marks recorded")]
    NoMarks,
    #[error("failed to write dump: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize dump: {0}")]
    Serialize(serde_json::Error),
}

// serde_json wraps writer failures in its own error type.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Serialize(err)
        }
    }
}
