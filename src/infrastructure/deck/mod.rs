//! Deck I/O - Anki 导出文件的读取与写出

mod reader;
mod writer;

pub use reader::{detect_delimiter, open_deck, DeckReader};
pub use writer::{output_path, DeckWriter};

use crate::application::ports::DeckError;

/// csv 错误转换，`line_offset` 为 csv 之前已读取的头部行数
fn csv_error(err: csv::Error, line_offset: usize) -> DeckError {
    let line = err
        .position()
        .map(|p| p.line() as usize + line_offset)
        .unwrap_or(line_offset);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => DeckError::IoError(io),
        _ => DeckError::Malformed { line, message },
    }
}
