//! 发音音频引用

use std::fmt;

/// 缓存中允许的音频扩展名
///
/// 顺序即探测优先级：ogg 优先于 mp3。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioExtension {
    Ogg,
    Mp3,
}

impl AudioExtension {
    /// 按探测优先级排列的全部扩展名
    pub const PROBE_ORDER: [AudioExtension; 2] = [AudioExtension::Ogg, AudioExtension::Mp3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
        }
    }

    /// 根据响应声明的媒体类型推断扩展名
    ///
    /// 类型中提到 ogg 即为 ogg；没有类型或类型为通用二进制时参考 URL 路径；其余默认 mp3。
    pub fn infer(content_type: Option<&str>, url: &str) -> Self {
        let content_type = content_type.map(|t| t.to_ascii_lowercase());
        match content_type.as_deref() {
            Some(t) if t.contains("ogg") => Self::Ogg,
            None | Some("application/octet-stream") | Some("") => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                if path.to_ascii_lowercase().ends_with(".ogg") {
                    Self::Ogg
                } else {
                    Self::Mp3
                }
            }
            Some(_) => Self::Mp3,
        }
    }
}

impl fmt::Display for AudioExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成缓存文件名主干 `<candidate>_<lang>`
///
/// 文件名中非法的字符替换为 `_`，映射是纯函数，同样的输入总是得到同样的路径。
pub fn file_stem(candidate: &str, lang: &str) -> String {
    let safe: String = candidate
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_{}", safe, lang)
}

/// 已落盘的发音音频
///
/// 创建后不可变；渲染为 Anki 的 `[sound:<filename>]` 标记。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundReference {
    filename: String,
    language: String,
}

impl SoundReference {
    pub fn new(filename: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            language: language.into(),
        }
    }

    /// 由文件名主干和扩展名构造
    pub fn from_stem(stem: &str, ext: AudioExtension, language: impl Into<String>) -> Self {
        Self::new(format!("{}.{}", stem, ext), language)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Anki 声音标记
    pub fn markup(&self) -> String {
        format!("[sound:{}]", self.filename)
    }
}

impl fmt::Display for SoundReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[sound:{}]", self.filename)
    }
}
