use super::error::{ContactSheetError, Result};
use super::media_tools::MediaTools;
use crate::tools::VideoItem;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 已擷取的畫格
#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    pub timestamp: f64,
    pub path: PathBuf,
}

/// 單一影片的擷取結果
///
/// 所有畫格都放在 `job_dir` 內，目錄名稱包含影片名稱與隨機識別碼，
/// 不同影片（或同一影片重試）不會互相覆寫。
#[derive(Debug, Clone)]
pub struct SampledFrames {
    pub job_dir: PathBuf,
    pub screenshots: Vec<Screenshot>,
    pub failed: usize,
}

/// 均勻時間點：`i * duration / count`，`i = 0..count`
#[must_use]
pub fn sample_timestamps(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 || duration <= 0.0 {
        return Vec::new();
    }

    (0..count)
        .map(|i| i as f64 * duration / count as f64)
        .collect()
}

/// 畫格檔名：索引 + 四捨五入到小數兩位的時間點
#[must_use]
pub fn frame_file_name(index: usize, timestamp: f64) -> String {
    format!("frame_{index:03}_{timestamp:.2}.jpg")
}

/// 在暫存資料夾下建立此影片專用的工作目錄
pub fn create_job_dir(video: &VideoItem, temp_dir: &Path) -> Result<PathBuf> {
    let token = Uuid::new_v4().simple().to_string();
    let job_dir = temp_dir.join(format!("{}_{}", video.stem(), &token[..8]));

    fs::create_dir_all(&job_dir).map_err(|e| ContactSheetError::filesystem(&job_dir, e))?;
    Ok(job_dir)
}

/// 依序擷取 `count` 張畫格
///
/// 單張擷取失敗只記錄警告並略過，畫格數量由合併階段檢查。
pub fn sample_frames(
    tools: &dyn MediaTools,
    video: &VideoItem,
    duration: f64,
    count: usize,
    temp_dir: &Path,
) -> Result<SampledFrames> {
    let job_dir = create_job_dir(video, temp_dir)?;
    let timestamps = sample_timestamps(duration, count);

    let mut screenshots = Vec::with_capacity(timestamps.len());
    let mut failed = 0;

    for (index, timestamp) in timestamps.into_iter().enumerate() {
        let output_path = job_dir.join(frame_file_name(index, timestamp));

        match tools.extract(&video.path, timestamp, &output_path) {
            Ok(()) => screenshots.push(Screenshot {
                timestamp,
                path: output_path,
            }),
            Err(e) => {
                warn!("畫格擷取失敗 [{index}]: {e}");
                failed += 1;
            }
        }
    }

    debug!(
        "{}: 擷取成功 {}, 失敗 {failed}",
        video.display_name,
        screenshots.len()
    );

    Ok(SampledFrames {
        job_dir,
        screenshots,
        failed,
    })
}

/// 刪除工作目錄內的畫格與目錄本身，失敗只記錄警告
pub fn remove_frames(frames: &SampledFrames) {
    for screenshot in &frames.screenshots {
        if screenshot.path.exists() && fs::remove_file(&screenshot.path).is_err() {
            warn!("無法刪除暫存畫格: {}", screenshot.path.display());
        }
    }

    if frames.job_dir.exists() && fs::remove_dir_all(&frames.job_dir).is_err() {
        warn!("無法清理暫存目錄: {}", frames.job_dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_timestamps_hour_long_video() {
        let timestamps = sample_timestamps(3600.0, 36);

        assert_eq!(timestamps.len(), 36);
        for (i, t) in timestamps.iter().enumerate() {
            assert!((t - i as f64 * 100.0).abs() < 1e-9);
        }
        assert!((timestamps[35] - 3500.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_timestamps_increasing_and_bounded() {
        let duration = 7.3;
        let timestamps = sample_timestamps(duration, 36);

        assert_eq!(timestamps.len(), 36);
        assert!(timestamps[0].abs() < f64::EPSILON);
        for pair in timestamps.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(timestamps.iter().all(|t| *t < duration));
    }

    #[test]
    fn test_sample_timestamps_edge_cases() {
        assert!(sample_timestamps(0.0, 10).is_empty());
        assert!(sample_timestamps(100.0, 0).is_empty());
        assert!(sample_timestamps(-10.0, 10).is_empty());
        assert_eq!(sample_timestamps(100.0, 1), vec![0.0]);
    }

    #[test]
    fn test_frame_file_name_unique_for_short_video() {
        // 0.1 秒影片取 36 張，時間點四捨五入後會重複，索引保證檔名唯一
        let names: std::collections::HashSet<_> = sample_timestamps(0.1, 36)
            .into_iter()
            .enumerate()
            .map(|(i, t)| frame_file_name(i, t))
            .collect();

        assert_eq!(names.len(), 36);
        assert_eq!(frame_file_name(4, 12.345), "frame_004_12.35.jpg");
    }

    #[test]
    fn test_job_dirs_are_distinct_per_run() {
        let temp = tempfile::tempdir().unwrap();
        let video = VideoItem::new(PathBuf::from("/videos/clip.mp4"));

        let first = create_job_dir(&video, temp.path()).unwrap();
        let second = create_job_dir(&video, temp.path()).unwrap();

        assert_ne!(first, second);
        assert!(first.is_dir());
        assert!(
            first
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("clip_")
        );
    }
}
