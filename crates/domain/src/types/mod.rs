//! Domain types and models

pub mod record;
pub mod remote;
pub mod token;

pub use record::{Pagination, Record, RecordAck, RecordId};
pub use remote::{FmsErrorCode, RemoteError};
pub use token::TokenRecord;
