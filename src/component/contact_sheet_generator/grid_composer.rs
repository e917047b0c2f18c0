use super::error::{ContactSheetError, Result};
use super::frame_sampler::{SampledFrames, remove_frames};
use super::media_tools::{MediaTools, MontageRequest};
use super::metadata_probe::{NOT_AVAILABLE, ProbeResult};
use crate::config::ContactSheetSettings;
use crate::tools::VideoItem;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 標題上方保留的空白行數
const CAPTION_PADDING_LINES: usize = 8;

/// 預覽圖網格配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub margin: u32,
    pub border: u32,
    pub point_size: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::from(&ContactSheetSettings::default())
    }
}

impl From<&ContactSheetSettings> for GridSpec {
    fn from(settings: &ContactSheetSettings) -> Self {
        Self {
            rows: settings.rows,
            cols: settings.cols,
            margin: settings.margin,
            border: settings.border,
            point_size: settings.point_size,
        }
    }
}

impl GridSpec {
    /// 網格需要的畫格數，列或欄為零、或乘積溢位時回傳錯誤
    pub fn frame_count(&self) -> Result<usize> {
        self.rows
            .checked_mul(self.cols)
            .filter(|&count| count > 0)
            .ok_or_else(|| {
                ContactSheetError::Composition(format!(
                    "網格設定無效: {}x{}",
                    self.cols, self.rows
                ))
            })
    }

    /// 合併工具的 `欄x列` 參數
    #[must_use]
    pub fn tile(&self) -> String {
        format!("{}x{}", self.cols, self.rows)
    }
}

/// 已產生的預覽圖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSheet {
    pub output_path: PathBuf,
    pub caption: String,
}

/// 輸出路徑：`output_dir/<影片名稱>.jpg`
#[must_use]
pub fn output_path_for(video: &VideoItem, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.jpg", video.stem()))
}

/// 格式化為 `HH:MM:SS.ss`
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    // 先四捨五入到百分之一秒再拆分，避免出現 60 秒
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let hours = centis / 360_000;
    let minutes = centis / 6_000 % 60;
    let secs = centis / 100 % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}.{:02}", centis % 100)
}

/// 建立預覽圖上方的影片資訊文字
#[must_use]
pub fn build_caption(video: &VideoItem, probe: &ProbeResult, file_size: u64) -> String {
    let or_na = |value: Option<&String>| value.map_or(NOT_AVAILABLE, String::as_str).to_string();

    let (audio_codec, sample_rate) = probe.audio.as_ref().map_or_else(
        || ("none".to_string(), NOT_AVAILABLE.to_string()),
        |audio| (or_na(audio.codec.as_ref()), or_na(audio.sample_rate.as_ref())),
    );

    let size_mb = file_size as f64 / (1024.0 * 1024.0);

    format!(
        "{padding}Video Information\n\n\
         Filename: {name}\n\
         Duration: {duration}; Resolution: {resolution}\n\
         Bitrate: {bit_rate}; Video codec: {codec}; Frame rate: {fps:.2} FPS;\n\
         Audio codec: {audio_codec}; Sample rate: {sample_rate}; File size: {size_mb:.2} MB",
        padding = "\n".repeat(CAPTION_PADDING_LINES),
        name = video.display_name,
        duration = format_duration(probe.duration),
        resolution = probe.video.resolution(),
        bit_rate = or_na(probe.video.bit_rate.as_ref()),
        codec = or_na(probe.video.codec.as_ref()),
        fps = probe.video.frame_rate,
    )
}

/// 合併畫格為預覽圖
///
/// 畫格數量必須剛好等於網格大小，否則回傳 [`ContactSheetError::Composition`]。
/// 成功後刪除此影片的暫存畫格；刪除失敗不影響結果。
pub fn compose(
    tools: &dyn MediaTools,
    video: &VideoItem,
    frames: &SampledFrames,
    probe: &ProbeResult,
    grid: &GridSpec,
    output_dir: &Path,
) -> Result<ContactSheet> {
    let expected = grid.frame_count()?;
    if frames.screenshots.len() != expected {
        return Err(ContactSheetError::Composition(format!(
            "畫格數量不符: 需要 {expected} 張，實際 {} 張（擷取失敗 {} 張）",
            frames.screenshots.len(),
            frames.failed
        )));
    }

    let mut ordered: Vec<_> = frames.screenshots.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    let images: Vec<PathBuf> = ordered.into_iter().map(|s| s.path.clone()).collect();

    let file_size = fs::metadata(&video.path)
        .map_err(|e| ContactSheetError::filesystem(&video.path, e))?
        .len();
    let caption = build_caption(video, probe, file_size);
    let output_path = output_path_for(video, output_dir);

    debug!("合併 {} 張畫格: {}", images.len(), video.display_name);

    tools.compose(&MontageRequest {
        images: &images,
        tile: grid.tile(),
        margin: grid.margin,
        border: grid.border,
        point_size: grid.point_size,
        caption: &caption,
        output_path: &output_path,
    })?;

    remove_frames(frames);

    info!("預覽圖已建立: {}", output_path.display());

    Ok(ContactSheet {
        output_path,
        caption,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::contact_sheet_generator::metadata_probe::{
        AudioStreamInfo, VideoStreamInfo,
    };

    fn sample_probe(audio: Option<AudioStreamInfo>) -> ProbeResult {
        ProbeResult {
            duration: 125.5,
            video: VideoStreamInfo {
                width: Some(1280),
                height: Some(720),
                bit_rate: Some("2500000".to_string()),
                codec: Some("h264".to_string()),
                frame_rate: 30000.0 / 1001.0,
            },
            audio,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(125.5), "00:02:05.50");
        assert_eq!(format_duration(0.0), "00:00:00.00");
        assert_eq!(format_duration(3600.0), "01:00:00.00");
        assert_eq!(format_duration(3725.25), "01:02:05.25");
    }

    #[test]
    fn test_format_duration_rounds_into_next_minute() {
        assert_eq!(format_duration(59.999), "00:01:00.00");
        assert_eq!(format_duration(3599.996), "01:00:00.00");
        assert_eq!(format_duration(59.994), "00:00:59.99");
    }

    #[test]
    fn test_grid_frame_count_rejects_empty_or_overflowing_grid() {
        let zero_rows = GridSpec {
            rows: 0,
            ..GridSpec::default()
        };
        assert!(matches!(
            zero_rows.frame_count(),
            Err(ContactSheetError::Composition(_))
        ));

        let huge = GridSpec {
            rows: usize::MAX,
            cols: 2,
            ..GridSpec::default()
        };
        assert!(matches!(
            huge.frame_count(),
            Err(ContactSheetError::Composition(_))
        ));
    }

    #[test]
    fn test_grid_spec_defaults() {
        let grid = GridSpec::default();
        assert_eq!(grid.rows, 3);
        assert_eq!(grid.cols, 12);
        assert_eq!(grid.frame_count().unwrap(), 36);
        assert_eq!(grid.margin, 10);
        assert_eq!(grid.tile(), "12x3");
    }

    #[test]
    fn test_output_path_uses_stem() {
        let video = VideoItem::new(PathBuf::from("/videos/trip.mkv"));
        assert_eq!(
            output_path_for(&video, Path::new("/out")),
            PathBuf::from("/out/trip.jpg")
        );
    }

    #[test]
    fn test_build_caption_with_audio() {
        let video = VideoItem::new(PathBuf::from("/videos/trip.mkv"));
        let probe = sample_probe(Some(AudioStreamInfo {
            codec: Some("aac".to_string()),
            sample_rate: Some("48000".to_string()),
        }));

        let caption = build_caption(&video, &probe, 3 * 1024 * 1024 + 512 * 1024);

        assert!(caption.starts_with(&"\n".repeat(CAPTION_PADDING_LINES)));
        assert!(caption.contains("Filename: trip.mkv"));
        assert!(caption.contains("Duration: 00:02:05.50; Resolution: 1280x720"));
        assert!(caption.contains("Bitrate: 2500000; Video codec: h264; Frame rate: 29.97 FPS;"));
        assert!(caption.contains("Audio codec: aac; Sample rate: 48000; File size: 3.50 MB"));
    }

    #[test]
    fn test_build_caption_without_audio() {
        let video = VideoItem::new(PathBuf::from("/videos/silent.mp4"));
        let mut probe = sample_probe(None);
        probe.video.bit_rate = None;
        probe.video.width = None;

        let caption = build_caption(&video, &probe, 0);

        assert!(caption.contains("Resolution: N/A"));
        assert!(caption.contains("Bitrate: N/A;"));
        assert!(caption.contains("Audio codec: none; Sample rate: N/A; File size: 0.00 MB"));
    }
}
