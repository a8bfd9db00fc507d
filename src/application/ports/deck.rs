//! Deck Port - 导出文件读写抽象

use thiserror::Error;

use crate::domain::Record;

/// 导出文件读写错误
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed row at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// 记录输出端
///
/// 每条记录处理完即写出，出错或中止时调用 `finish` 刷新已写内容
pub trait RecordSink {
    fn write_record(&mut self, record: &Record) -> Result<(), DeckError>;

    fn finish(&mut self) -> Result<(), DeckError>;
}
