pub mod execute;
pub mod prepared;

pub use execute::{PreparedParameter, StmtExecute};
pub use prepared::PrepareOk;
