//! Deck Writer - 写出可直接导入 Anki 的制表符分隔文件

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::csv_error;
use crate::application::ports::{DeckError, RecordSink};
use crate::domain::Record;

/// 输出文件头部
const HEADER_LINES: [&str; 3] = ["#separator:tab", "#html:true", "#guid column:1"];

/// 输出文件路径：`<stem>_pronunciations.<ext>`，与输入同目录
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tsv".to_string());
    input.with_file_name(format!("{}_pronunciations.{}", stem, ext))
}

/// 输出端
///
/// 含制表符、引号或换行的字段由 csv 加引号
pub struct DeckWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl DeckWriter<File> {
    /// 创建输出文件，已存在的同名文件会先被删除
    pub fn create(path: &Path) -> Result<Self, DeckError> {
        if path.exists() {
            fs::remove_file(path)?;
            tracing::debug!(path = %path.display(), "Removed previous output");
        }
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> DeckWriter<W> {
    /// 包装任意输出并写入头部
    pub fn new(mut writer: W) -> Result<Self, DeckError> {
        for line in HEADER_LINES {
            writeln!(writer, "{}", line)?;
        }
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> Result<W, DeckError> {
        self.writer
            .into_inner()
            .map_err(|e| DeckError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

impl<W: Write> RecordSink for DeckWriter<W> {
    fn write_record(&mut self, record: &Record) -> Result<(), DeckError> {
        self.writer
            .write_record([record.id.as_str(), record.front.as_str(), record.back.as_str()])
            .map_err(|e| csv_error(e, 0))
    }

    fn finish(&mut self) -> Result<(), DeckError> {
        self.writer.flush()?;
        Ok(())
    }
}
