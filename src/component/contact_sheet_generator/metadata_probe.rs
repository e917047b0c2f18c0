//! 影片資訊探測
//!
//! 透過 [`MediaTools::probe`] 取得長度、視訊串流與音訊串流資訊。

use super::error::{ContactSheetError, Result};
use super::media_tools::MediaTools;
use crate::tools::StreamSelector;
use log::debug;
use std::path::Path;

/// 缺少欄位時顯示的文字
pub const NOT_AVAILABLE: &str = "N/A";

/// 視訊串流資訊
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bit_rate: Option<String>,
    pub codec: Option<String>,
    pub frame_rate: f64,
}

impl VideoStreamInfo {
    /// `寬x高`，任一缺少時為 `N/A`
    #[must_use]
    pub fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(width), Some(height)) => format!("{width}x{height}"),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

/// 音訊串流資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStreamInfo {
    pub codec: Option<String>,
    pub sample_rate: Option<String>,
}

/// 單一影片的探測結果
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub duration: f64,
    pub video: VideoStreamInfo,
    pub audio: Option<AudioStreamInfo>,
}

/// 取得影片長度（秒），保證大於 0
pub fn probe_duration(tools: &dyn MediaTools, path: &Path) -> Result<f64> {
    let probe = tools.probe(path, StreamSelector::Duration)?;

    let raw = probe
        .duration()
        .ok_or_else(|| ContactSheetError::probe(path, "沒有長度欄位"))?;

    let duration: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ContactSheetError::probe(path, format!("無法解析長度 `{raw}`")))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(ContactSheetError::probe(
            path,
            format!("長度無效: {duration}"),
        ));
    }

    debug!("影片長度 {}: {duration:.2}s", path.display());
    Ok(duration)
}

/// 取得第一個視訊串流的資訊
pub fn probe_video_stream(tools: &dyn MediaTools, path: &Path) -> Result<VideoStreamInfo> {
    let probe = tools.probe(path, StreamSelector::Video)?;
    let stream = probe
        .first_stream()
        .ok_or_else(|| ContactSheetError::probe(path, "找不到視訊串流"))?;

    // 沒有 r_frame_rate 時視為 0/1
    let frame_rate = parse_frame_rate(stream.r_frame_rate.as_deref().unwrap_or("0/1"))?;

    Ok(VideoStreamInfo {
        width: stream.width,
        height: stream.height,
        bit_rate: stream.bit_rate.clone(),
        codec: stream.codec_name.clone(),
        frame_rate,
    })
}

/// 取得第一個音訊串流的資訊，沒有音訊時回傳 `None`
pub fn probe_audio_stream(
    tools: &dyn MediaTools,
    path: &Path,
) -> Result<Option<AudioStreamInfo>> {
    let probe = tools.probe(path, StreamSelector::Audio)?;

    Ok(probe.first_stream().map(|stream| AudioStreamInfo {
        codec: stream.codec_name.clone(),
        sample_rate: stream.sample_rate.clone(),
    }))
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
///
/// 只接受 `分子/分母` 兩個數值，分母不可為零。
pub fn parse_frame_rate(rate: &str) -> Result<f64> {
    let (num_str, den_str) = rate
        .split_once('/')
        .ok_or_else(|| ContactSheetError::parse(rate, "缺少 `/`"))?;

    let parse_part = |part: &str| {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ContactSheetError::parse(rate, format!("`{part}` 不是數值")))
    };

    let num = parse_part(num_str)?;
    let den = parse_part(den_str)?;

    if den == 0.0 {
        return Err(ContactSheetError::parse(rate, "分母為零"));
    }

    Ok(num / den)
}
