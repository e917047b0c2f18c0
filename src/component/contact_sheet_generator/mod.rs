//! 影片預覽圖生成元件
//!
//! 四階段流程：
//! A. 取得影片長度（ffprobe）
//! B. 均勻擷取畫格（ffmpeg）
//! C. 取得視訊 / 音訊串流資訊（ffprobe）
//! D. 合併為網格預覽圖（ImageMagick montage）

mod error;
mod frame_sampler;
mod grid_composer;
mod main;
mod media_tools;
mod metadata_probe;

pub use error::{ContactSheetError, Result};
pub use frame_sampler::{
    SampledFrames, Screenshot, create_job_dir, frame_file_name, remove_frames, sample_frames,
    sample_timestamps,
};
pub use grid_composer::{
    ContactSheet, GridSpec, build_caption, compose, format_duration, output_path_for,
};
pub use main::{
    BatchPaths, BatchProgress, BatchReport, ContactSheetGenerator, VideoOutcome, VideoReport,
};
pub use media_tools::{FfmpegTools, MediaTools, MontageRequest};
pub use metadata_probe::{
    AudioStreamInfo, NOT_AVAILABLE, ProbeResult, VideoStreamInfo, parse_frame_rate,
    probe_audio_stream, probe_duration, probe_video_stream,
};
