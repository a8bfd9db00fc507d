//! Deck Reader - 读取 Anki 导出的分隔文本

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::csv_error;
use crate::application::ports::DeckError;
use crate::domain::Record;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 按扩展名推断分隔符：`.csv` 为逗号，其余为制表符
pub fn detect_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

/// 解析 Anki 头部 `#separator:` 的取值
fn parse_separator(value: &str) -> Option<u8> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tab" => Some(b'\t'),
        "comma" => Some(b','),
        "semicolon" => Some(b';'),
        "pipe" => Some(b'|'),
        "space" => Some(b' '),
        other => match other.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        },
    }
}

/// 打开导出文件
pub fn open_deck(path: &Path) -> Result<DeckReader<BufReader<File>>, DeckError> {
    let file = File::open(path)?;
    DeckReader::new(BufReader::new(file), detect_delimiter(path))
}

/// 逐行产出 `Record` 的迭代器
///
/// 只在第一行数据之前识别 `#` 头部行，之后的 `#` 开头内容按数据处理（guid 可能以 `#` 开头）。
/// id、正面、背面任一为空的行被跳过，多余的列被忽略。
pub struct DeckReader<R> {
    records: csv::StringRecordsIntoIter<R>,
    /// 头部占用的行数，用于还原错误行号
    header_lines: usize,
    done: bool,
}

impl<R: BufRead> DeckReader<R> {
    /// 读取头部行后交给 csv 解析剩余内容
    pub fn new(mut reader: R, delimiter: u8) -> Result<Self, DeckError> {
        let mut delimiter = delimiter;
        let mut header_lines = 0;

        if reader.fill_buf()?.starts_with(UTF8_BOM) {
            reader.consume(UTF8_BOM.len());
        }

        while reader.fill_buf()?.first() == Some(&b'#') {
            let mut raw = Vec::new();
            reader.read_until(b'\n', &mut raw)?;
            header_lines += 1;

            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\r', '\n']);
            if let Some(value) = line.strip_prefix("#separator:") {
                match parse_separator(value) {
                    Some(separator) => delimiter = separator,
                    None => tracing::warn!(value = %value, "Unknown separator header, ignoring"),
                }
            }
        }

        let records = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(false)
            .comment(None)
            .from_reader(reader)
            .into_records();

        Ok(Self {
            records,
            header_lines,
            done: false,
        })
    }
}

impl<R: BufRead> Iterator for DeckReader<R> {
    type Item = Result<Record, DeckError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let row = match self.records.next()? {
                Ok(row) => row,
                Err(e) => {
                    self.done = true;
                    return Some(Err(csv_error(e, self.header_lines)));
                }
            };

            match (row.get(0), row.get(1), row.get(2)) {
                (Some(id), Some(front), Some(back))
                    if ![id, front, back].iter().any(|f| f.trim().is_empty()) =>
                {
                    return Some(Ok(Record::new(id, front, back)));
                }
                _ => {
                    let line = row
                        .position()
                        .map(|p| p.line() as usize + self.header_lines);
                    tracing::debug!(line = ?line, "Skipping row with missing fields");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str, delimiter: u8) -> Vec<Record> {
        DeckReader::new(Cursor::new(input.to_string()), delimiter)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(Path::new("deck.csv")), b',');
        assert_eq!(detect_delimiter(Path::new("deck.CSV")), b',');
        assert_eq!(detect_delimiter(Path::new("deck.txt")), b'\t');
        assert_eq!(detect_delimiter(Path::new("deck")), b'\t');
    }

    #[test]
    fn test_reads_tab_separated_rows() {
        let records = read_all("g1\tel gato\tthe cat\ng2\tla casa\tthe house\n", b'\t');
        assert_eq!(
            records,
            vec![
                Record::new("g1", "el gato", "the cat"),
                Record::new("g2", "la casa", "the house"),
            ]
        );
    }

    #[test]
    fn test_header_overrides_delimiter() {
        let input = "#separator:comma\n#html:true\ng1,hola,hello\n";
        let records = read_all(input, b'\t');
        assert_eq!(records, vec![Record::new("g1", "hola", "hello")]);
    }

    #[test]
    fn test_named_and_literal_separators() {
        assert_eq!(parse_separator("Semicolon"), Some(b';'));
        assert_eq!(parse_separator(" pipe "), Some(b'|'));
        assert_eq!(parse_separator(":"), Some(b':'));
        assert_eq!(parse_separator("ü"), None);
        assert_eq!(parse_separator("unknown"), None);
    }

    #[test]
    fn test_hash_after_first_row_is_data() {
        let records = read_all("g1\tuno\tone\n#g2\tdos\ttwo\n", b'\t');
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "#g2");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let records = read_all("g1\tsolo\n\ng2\tdos\ttwo\textra\n", b'\t');
        assert_eq!(records, vec![Record::new("g2", "dos", "two")]);
    }

    #[test]
    fn test_rows_with_empty_fields_are_skipped() {
        let input = "\tuno\tone\ng1\t\tback\ng2\tdos\t\ng3\t  \tthree\ng4\ttres\tthree\n";
        let records = read_all(input, b'\t');
        assert_eq!(records, vec![Record::new("g4", "tres", "three")]);
    }

    #[test]
    fn test_quoted_fields() {
        let input = "g1,\"uno, dos\",\"say \"\"hi\"\"\"\ng2,\"line\nbreak\",x\n";
        let records = read_all(input, b',');
        assert_eq!(records[0].front, "uno, dos");
        assert_eq!(records[0].back, "say \"hi\"");
        assert_eq!(records[1].front, "line\nbreak");
    }

    #[test]
    fn test_crlf_and_bom() {
        let records = read_all("\u{feff}#separator:tab\r\ng1\tgato\tcat\r\n", b',');
        assert_eq!(records, vec![Record::new("g1", "gato", "cat")]);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let input = b"#separator:tab\ng1\tgato\tcat\ng2\t\xff\tcat\n".to_vec();
        let mut reader = DeckReader::new(Cursor::new(input), b'\t').unwrap();

        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, DeckError::Malformed { line: 3, .. }));
        assert!(reader.next().is_none());
    }
}
