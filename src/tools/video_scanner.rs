use crate::config::is_video_file;
use log::warn;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 待處理的影片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub path: PathBuf,
    pub display_name: String,
}

impl VideoItem {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().to_string());

        Self { path, display_name }
    }

    /// 不含副檔名的檔名
    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string())
    }
}

/// 列出資料夾（不含子資料夾）中的影片，依檔名排序
///
/// 資料夾本身無法讀取時回傳錯誤；個別項目讀取失敗只記錄警告。
pub fn scan_video_files(directory: &Path) -> io::Result<Vec<VideoItem>> {
    let mut videos = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_video_file(entry.path()) {
                    videos.push(VideoItem::new(entry.into_path()));
                }
            }
            Err(e) if e.path().is_none_or(|p| p == directory) => return Err(e.into()),
            Err(e) => warn!("無法讀取項目: {e}"),
        }
    }

    Ok(videos)
}
