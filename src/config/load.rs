use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result, ensure};
use log::warn;
use std::fs;
use std::path::Path;

/// 設定檔位置（目前工作目錄）
pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    /// 載入設定；設定檔損毀時記錄警告並使用預設值
    #[must_use]
    pub fn new() -> Self {
        let settings = Self::load_settings(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("無法載入設定，使用預設值: {e:#}");
            UserSettings::default()
        });

        Self { settings }
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: UserSettings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        let sheet = &settings.contact_sheet;
        ensure!(
            sheet
                .rows
                .checked_mul(sheet.cols)
                .is_some_and(|count| count > 0),
            "Invalid grid {}x{} in {}",
            sheet.cols,
            sheet.rows,
            path.display()
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Language;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Config::load_settings(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.contact_sheet.rows * settings.contact_sheet.cols, 36);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"language": "zh-TW", "contact_sheet": {"rows": 4}}"#,
        )
        .unwrap();

        let settings = Config::load_settings(&path).unwrap();
        assert_eq!(settings.language, Language::TraditionalChinese);
        assert_eq!(settings.contact_sheet.rows, 4);
        assert_eq!(settings.contact_sheet.cols, 12);
        assert_eq!(settings.contact_sheet.margin, 10);
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        assert!(Config::load_settings(&path).is_err());
    }

    #[test]
    fn test_load_rejects_empty_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        for grid in [r#"{"rows": 0}"#, r#"{"cols": 0}"#] {
            fs::write(&path, format!(r#"{{"contact_sheet": {grid}}}"#)).unwrap();
            assert!(Config::load_settings(&path).is_err(), "應拒絕: {grid}");
        }
    }
}
