use super::error::{ContactSheetError, Result};
use super::frame_sampler::{remove_frames, sample_frames};
use super::grid_composer::{ContactSheet, GridSpec, compose, output_path_for};
use super::media_tools::MediaTools;
use super::metadata_probe::{ProbeResult, probe_audio_stream, probe_duration, probe_video_stream};
use crate::config::ContactSheetSettings;
use crate::tools::{VideoItem, scan_video_files};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// 批次處理使用的三個資料夾
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPaths {
    pub source_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// 單一影片的處理結果
#[derive(Debug)]
pub enum VideoOutcome {
    /// 預覽圖已建立
    Completed(ContactSheet),
    /// 探測失敗，未產生預覽圖
    Skipped(ContactSheetError),
    /// 預覽圖已存在（`skip_existing`）
    AlreadyExists(PathBuf),
    /// 擷取或合併階段失敗
    Failed(ContactSheetError),
}

#[derive(Debug)]
pub struct VideoReport {
    pub video: VideoItem,
    pub outcome: VideoOutcome,
}

/// 預覽圖生成結果
#[derive(Debug, Default)]
pub struct BatchReport {
    pub videos: Vec<VideoReport>,
    /// 收到中斷訊號，剩餘影片未處理
    pub cancelled: bool,
}

impl BatchReport {
    #[must_use]
    pub fn total_videos(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn successful(&self) -> usize {
        self.count(|o| matches!(o, VideoOutcome::Completed(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, VideoOutcome::Skipped(_) | VideoOutcome::AlreadyExists(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, VideoOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&VideoOutcome) -> bool) -> usize {
        self.videos.iter().filter(|v| predicate(&v.outcome)).count()
    }
}

/// 批次進度，每處理完（或跳過）一部影片前進一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub total_videos: usize,
    pub current_index: usize,
}

impl BatchProgress {
    #[must_use]
    pub const fn new(total_videos: usize) -> Self {
        Self {
            total_videos,
            current_index: 0,
        }
    }

    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(self.total_videos);
    }

    /// 整體百分比，沒有影片時視為 100
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total_videos == 0 {
            return 100.0;
        }
        self.current_index as f64 / self.total_videos as f64 * 100.0
    }
}

/// 預覽圖生成器
///
/// 逐一處理影片：
/// A. 取得影片長度
/// B. 均勻擷取畫格
/// C. 取得視訊 / 音訊串流資訊
/// D. 合併為網格預覽圖並清理暫存畫格
pub struct ContactSheetGenerator<T: MediaTools> {
    tools: T,
    grid: GridSpec,
    pause_between_videos: Duration,
    skip_existing: bool,
    shutdown_signal: Arc<AtomicBool>,
}

impl<T: MediaTools> ContactSheetGenerator<T> {
    pub fn new(tools: T, settings: &ContactSheetSettings, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            tools,
            grid: GridSpec::from(settings),
            pause_between_videos: settings.pause_between_videos(),
            skip_existing: settings.skip_existing,
            shutdown_signal,
        }
    }

    #[must_use]
    pub const fn tools(&self) -> &T {
        &self.tools
    }

    /// 處理來源資料夾中的所有影片
    ///
    /// 每部影片結束後以 `(整體百分比, 影片名稱)` 呼叫 `progress`。
    /// 只有來源資料夾無法讀取、或暫存 / 輸出資料夾無法建立時回傳錯誤，
    /// 個別影片的失敗記錄在 [`BatchReport`] 中。
    pub fn run<F>(&self, paths: &BatchPaths, mut progress: F) -> Result<BatchReport>
    where
        F: FnMut(f64, &str),
    {
        let videos = scan_video_files(&paths.source_dir)
            .map_err(|e| ContactSheetError::filesystem(&paths.source_dir, e))?;

        for dir in [&paths.temp_dir, &paths.output_dir] {
            fs::create_dir_all(dir).map_err(|e| ContactSheetError::filesystem(dir, e))?;
        }

        info!(
            "開始生成預覽圖: {} 個影片, 網格 {}x{}",
            videos.len(),
            self.grid.cols,
            self.grid.rows
        );

        let mut batch_progress = BatchProgress::new(videos.len());
        let mut report = BatchReport::default();

        if videos.is_empty() {
            progress(batch_progress.percent(), "");
            return Ok(report);
        }

        for (index, video) in videos.into_iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                report.cancelled = true;
                break;
            }

            if index > 0 && !self.pause_between_videos.is_zero() {
                thread::sleep(self.pause_between_videos);
            }

            info!(
                "處理中 [{}/{}] {}",
                index + 1,
                batch_progress.total_videos,
                video.display_name
            );

            let outcome = self.process_video(&video, paths);
            log_outcome(&video, &outcome);

            batch_progress.advance();
            progress(batch_progress.percent(), &video.display_name);

            report.videos.push(VideoReport { video, outcome });
        }

        info!(
            "預覽圖生成完成 - 成功: {}, 跳過: {}, 失敗: {}",
            report.successful(),
            report.skipped(),
            report.failed()
        );

        Ok(report)
    }

    /// 處理單一影片，所有錯誤都轉為 [`VideoOutcome`]
    pub fn process_video(&self, video: &VideoItem, paths: &BatchPaths) -> VideoOutcome {
        let output_path = output_path_for(video, &paths.output_dir);
        if self.skip_existing && output_path.exists() {
            return VideoOutcome::AlreadyExists(output_path);
        }

        // Stage A: 取得影片長度
        let duration = match probe_duration(&self.tools, &video.path) {
            Ok(duration) => duration,
            Err(e) => return VideoOutcome::Skipped(e),
        };

        // Stage B: 擷取畫格
        let frame_count = match self.grid.frame_count() {
            Ok(count) => count,
            Err(e) => return VideoOutcome::Failed(e),
        };
        let frames = match sample_frames(
            &self.tools,
            video,
            duration,
            frame_count,
            &paths.temp_dir,
        ) {
            Ok(frames) => frames,
            Err(e) => return VideoOutcome::Failed(e),
        };

        // Stage C: 串流資訊
        let probe = match self.probe_streams(&video.path, duration) {
            Ok(probe) => probe,
            Err(e) => {
                remove_frames(&frames);
                return VideoOutcome::Skipped(e);
            }
        };

        // Stage D: 合併預覽圖
        match compose(
            &self.tools,
            video,
            &frames,
            &probe,
            &self.grid,
            &paths.output_dir,
        ) {
            Ok(sheet) => VideoOutcome::Completed(sheet),
            Err(e) => {
                remove_frames(&frames);
                VideoOutcome::Failed(e)
            }
        }
    }

    fn probe_streams(&self, path: &Path, duration: f64) -> Result<ProbeResult> {
        let video = probe_video_stream(&self.tools, path)?;
        let audio = probe_audio_stream(&self.tools, path)?;

        if audio.is_none() {
            info!("沒有音訊串流，以無音訊標示: {}", path.display());
        }

        Ok(ProbeResult {
            duration,
            video,
            audio,
        })
    }
}

fn log_outcome(video: &VideoItem, outcome: &VideoOutcome) {
    match outcome {
        VideoOutcome::Completed(sheet) => {
            info!("  ✓ {} -> {}", video.display_name, sheet.output_path.display());
        }
        VideoOutcome::Skipped(e) => warn!("  跳過 {}: {e}", video.display_name),
        VideoOutcome::AlreadyExists(path) => {
            info!("  預覽圖已存在，跳過: {}", path.display());
        }
        VideoOutcome::Failed(e) => error!("處理影片失敗 {}: {e}", video.display_name),
    }
}
