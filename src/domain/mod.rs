//! Domain Layer - 领域层
//!
//! 纯数据与纯函数，不做任何 I/O:
//! - language: 语言代码校验
//! - record: 卡片记录
//! - sound: 发音音频引用与缓存文件命名
//! - word_forms: 词形展开

mod language;
mod record;
mod sound;
mod word_forms;

pub use language::{InvalidLanguage, Language};
pub use record::Record;
pub use sound::{file_stem, AudioExtension, SoundReference};
pub use word_forms::{expand, strip_article, strip_html, strip_punctuation};
