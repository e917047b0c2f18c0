use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// 確認資料夾存在且可讀取
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    fs::read_dir(path).with_context(|| format!("無法讀取資料夾: {}", path.display()))?;
    Ok(())
}

/// 整理使用者輸入的路徑：去除空白與拖放檔案時產生的引號
#[must_use]
pub fn normalize_input_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);

    PathBuf::from(unquoted)
}
