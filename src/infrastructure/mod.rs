//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod deck;
pub mod media;

pub use deck::{open_deck, output_path, DeckReader, DeckWriter};
pub use media::{anki_media_dir, DEFAULT_PROFILE};
