//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod download;
pub mod fake;
pub mod forvo;
pub mod storage;

pub use download::*;
pub use fake::*;
pub use forvo::*;
pub use storage::*;
