//! Forvo Adapter - 发音查询客户端实现

mod forvo_client;

pub use forvo_client::{ForvoClient, ForvoClientConfig};
