pub type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub const NO_DATA_BODY: &str = "Unable to retrieve concerts";
pub const INTERNAL_ERROR_BODY: &str = "Unable to retrieve concerts - Internal Server Error";

/// A storage read or scan that could not be completed.
#[derive(thiserror::Error, Debug)]
#[error("storage request failed: {0}")]
pub struct StoreError(#[source] pub GenericError);

impl StoreError {
    pub fn new(err: impl Into<GenericError>) -> Self {
        Self(err.into())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConcertError {
    #[error("concert {0} does not exist")]
    NotFound(String),
    #[error("invalid concert data for concert {0}")]
    InvalidData(String),
    #[error("concert {0} is in the past, tickets are no longer available")]
    InPast(String),
    #[error("unable to decode concert record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),
}

/// Classification of a [`ConcertError`] that front ends turn into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidData,
    InPast,
    DecodeError,
    StorageUnavailable,
}

impl ConcertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConcertError::NotFound(_) => ErrorKind::NotFound,
            ConcertError::InvalidData(_) => ErrorKind::InvalidData,
            ConcertError::InPast(_) => ErrorKind::InPast,
            ConcertError::Decode(_) => ErrorKind::DecodeError,
            ConcertError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl ErrorKind {
    /// Nothing the client may see exists, as opposed to the service failing.
    pub fn is_no_data(self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound | ErrorKind::InvalidData | ErrorKind::InPast
        )
    }

    pub fn status_code(self) -> u16 {
        if self.is_no_data() {
            404
        } else {
            500
        }
    }

    pub fn response_body(self) -> &'static str {
        if self.is_no_data() {
            NO_DATA_BODY
        } else {
            INTERNAL_ERROR_BODY
        }
    }
}
