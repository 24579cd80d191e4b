//! Concert listings: reads raw concert records from storage, validates them and
//! reshapes them for clients.

pub mod config;
pub mod dynamo;
pub mod error;
pub mod format;
pub mod model;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError};
pub use dynamo::DynamoConcertStore;
pub use error::{ConcertError, ErrorKind, GenericError, StoreError};
pub use format::format_epoch;
pub use model::{ClientConcert, RawConcert, RawItem};
pub use service::ConcertService;
pub use store::{ConcertStore, MemoryConcertStore};
