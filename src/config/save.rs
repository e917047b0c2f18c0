use crate::config::load::SETTINGS_FILE;
use crate::config::types::UserSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(settings, Path::new(SETTINGS_FILE))
}

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 記錄最近使用的三個資料夾
pub fn remember_folders(settings: &mut UserSettings, source: &Path, temp: &Path, output: &Path) {
    settings.last_source_dir = Some(PathBuf::from(source));
    settings.last_temp_dir = Some(PathBuf::from(temp));
    settings.last_output_dir = Some(PathBuf::from(output));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Config;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = UserSettings::default();
        settings.contact_sheet.skip_existing = true;
        remember_folders(
            &mut settings,
            Path::new("/in"),
            Path::new("/tmp/frames"),
            Path::new("/out"),
        );

        save_settings_to(&settings, &path).unwrap();
        let loaded = Config::load_settings(&path).unwrap();

        assert_eq!(loaded, settings);
        assert_eq!(loaded.last_output_dir, Some(PathBuf::from("/out")));
    }
}
