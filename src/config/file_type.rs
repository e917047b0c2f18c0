use std::path::Path;

/// 支援的影片副檔名
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mkv", "mov"];

/// 以副檔名判斷是否為影片（不分大小寫）
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|video_ext| video_ext.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("/x/y/B.MKV")));
        assert!(is_video_file(Path::new("c.mov")));
        assert!(!is_video_file(Path::new("d.webm")));
        assert!(!is_video_file(Path::new("mp4")));
        assert!(!is_video_file(Path::new("e.mp4.txt")));
    }
}
