//! Anki 媒体目录定位

use std::path::{Path, PathBuf};

/// 默认 Anki 用户配置名
pub const DEFAULT_PROFILE: &str = "User 1";

/// `<data_dir>/Anki2/<profile>/collection.media`
pub fn media_dir_in(data_dir: &Path, profile: &str) -> PathBuf {
    data_dir.join("Anki2").join(profile).join("collection.media")
}

/// 当前系统上指定用户的媒体目录
///
/// 无法确定系统数据目录时返回 None
pub fn anki_media_dir(profile: &str) -> Option<PathBuf> {
    dirs::data_dir().map(|data_dir| media_dir_in(&data_dir, profile))
}
