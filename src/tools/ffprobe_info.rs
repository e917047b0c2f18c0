use serde::Deserialize;

/// ffprobe 查詢目標
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSelector {
    /// 第一個視訊串流的長度（含容器長度備援）
    Duration,
    /// 第一個視訊串流的解析度、位元率、編碼與幀率
    Video,
    /// 第一個音訊串流的編碼與取樣率
    Audio,
}

impl StreamSelector {
    #[must_use]
    pub const fn select_streams(self) -> &'static str {
        match self {
            Self::Duration | Self::Video => "v:0",
            Self::Audio => "a:0",
        }
    }

    #[must_use]
    pub const fn show_entries(self) -> &'static str {
        match self {
            Self::Duration => "format=duration:stream=duration",
            Self::Video => "stream=width,height,bit_rate,codec_name,r_frame_rate",
            Self::Audio => "stream=codec_name,sample_rate",
        }
    }
}

/// ffprobe `-of json` 輸出
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FfprobeOutput {
    pub format: Option<FormatInfo>,
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatInfo {
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bit_rate: Option<String>,
    pub codec_name: Option<String>,
    pub r_frame_rate: Option<String>,
    pub sample_rate: Option<String>,
    pub duration: Option<String>,
}

impl FfprobeOutput {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn first_stream(&self) -> Option<&StreamInfo> {
        self.streams.first()
    }

    /// 取得影片長度字串（優先使用串流長度，其次容器長度）
    #[must_use]
    pub fn duration(&self) -> Option<&str> {
        self.first_stream()
            .and_then(|s| s.duration.as_deref())
            .or_else(|| self.format.as_ref().and_then(|f| f.duration.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_stream_json() {
        let json = r#"{
            "programs": [],
            "streams": [
                {
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080,
                    "r_frame_rate": "30000/1001",
                    "bit_rate": "4500000"
                }
            ]
        }"#;

        let probe = FfprobeOutput::from_json(json).unwrap();
        let stream = probe.first_stream().unwrap();

        assert_eq!(stream.codec_name.as_deref(), Some("h264"));
        assert_eq!(stream.width, Some(1920));
        assert_eq!(stream.height, Some(1080));
        assert_eq!(stream.r_frame_rate.as_deref(), Some("30000/1001"));
        assert_eq!(stream.bit_rate.as_deref(), Some("4500000"));
    }

    #[test]
    fn test_parse_empty_streams() {
        let probe = FfprobeOutput::from_json(r#"{"programs": [], "streams": []}"#).unwrap();
        assert!(probe.first_stream().is_none());
        assert!(probe.duration().is_none());
    }

    #[test]
    fn test_duration_prefers_stream_then_format() {
        let json = r#"{"streams": [{"duration": "12.5"}], "format": {"duration": "13.0"}}"#;
        assert_eq!(FfprobeOutput::from_json(json).unwrap().duration(), Some("12.5"));

        let json = r#"{"streams": [{}], "format": {"duration": "13.0"}}"#;
        assert_eq!(FfprobeOutput::from_json(json).unwrap().duration(), Some("13.0"));
    }

    #[test]
    fn test_selector_arguments() {
        assert_eq!(StreamSelector::Audio.select_streams(), "a:0");
        assert_eq!(StreamSelector::Video.select_streams(), "v:0");
        assert!(StreamSelector::Duration.show_entries().contains("format=duration"));
    }
}
