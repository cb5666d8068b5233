//! Binary-protocol decoding core of a MySQL proxy.
//!
//! Reconstructs typed representations of the two message kinds a proxy
//! cares about during prepared-statement execution: client
//! COM_STMT_EXECUTE requests and server COM_STMT_PREPARE OK
//! acknowledgements. The relay loop hands a framed byte slice in and gets
//! a decoded record or a typed error back; nothing here does I/O, caches,
//! or retries.

pub mod constant;
pub mod error;
pub mod protocol;

pub use error::{Error, Result};
pub use protocol::command::{PreparedParameter, PrepareOk, StmtExecute};
pub use protocol::value::{ParamType, ParamValue};
