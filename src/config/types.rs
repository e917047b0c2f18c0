use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::TraditionalChinese => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "English"),
            Self::TraditionalChinese => write!(f, "繁體中文"),
        }
    }
}

/// 預覽圖設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSheetSettings {
    pub rows: usize,
    pub cols: usize,
    pub margin: u32,
    pub border: u32,
    /// 標題字級
    pub point_size: u32,
    /// 合併指令，例如 `magick montage`
    pub montage_command: String,
    /// 每次呼叫外部工具的時間上限（秒）
    pub tool_timeout_secs: u64,
    /// 影片之間的暫停時間（毫秒）
    pub pause_between_videos_ms: u64,
    /// 輸出已存在時跳過
    pub skip_existing: bool,
}

impl Default for ContactSheetSettings {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 12,
            margin: 10,
            border: 20,
            point_size: 70,
            montage_command: "magick montage".to_string(),
            tool_timeout_secs: 120,
            pause_between_videos_ms: 100,
            skip_existing: false,
        }
    }
}

impl ContactSheetSettings {
    #[must_use]
    pub const fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    #[must_use]
    pub const fn pause_between_videos(&self) -> Duration {
        Duration::from_millis(self.pause_between_videos_ms)
    }
}

/// 使用者設定（存於 settings.json）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub contact_sheet: ContactSheetSettings,
    pub last_source_dir: Option<PathBuf>,
    pub last_temp_dir: Option<PathBuf>,
    pub last_output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
