//! 卡片记录

use super::sound::SoundReference;

/// 导出文件中的一行 `(id, front, back)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub front: String,
    pub back: String,
}

impl Record {
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
        }
    }

    /// 正面是否已经带有声音标记
    pub fn has_sound(&self) -> bool {
        self.front.contains("[sound:")
    }

    /// 在正面追加声音标记
    pub fn with_sound(mut self, sound: &SoundReference) -> Self {
        self.front.push_str(&sound.markup());
        self
    }
}
