//! CLI commands implementation

pub mod init;
pub mod log;
pub mod provision;
pub mod record;
pub mod status;

pub use init::*;
pub use log::*;
pub use provision::*;
pub use record::*;
pub use status::*;
