use super::error::{ContactSheetError, Result};
use crate::tools::{FfprobeOutput, StreamSelector, run_with_timeout};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;

/// 合併預覽圖的參數
#[derive(Debug, Clone)]
pub struct MontageRequest<'a> {
    /// 依時間排序的畫格（逐列填入網格）
    pub images: &'a [PathBuf],
    /// `欄x列`，例如 `12x3`
    pub tile: String,
    pub margin: u32,
    pub border: u32,
    pub point_size: u32,
    pub caption: &'a str,
    pub output_path: &'a Path,
}

/// 外部媒體工具介面
///
/// 探測、擷取與合併三種能力，測試時可以替換為假實作。
pub trait MediaTools {
    /// 查詢容器或串流資訊
    fn probe(&self, path: &Path, selector: StreamSelector) -> Result<FfprobeOutput>;

    /// 在 `timestamp` 秒擷取單一畫格，寫入 `output_path`
    fn extract(&self, path: &Path, timestamp: f64, output_path: &Path) -> Result<()>;

    /// 將多張畫格與標題合併為一張圖片
    fn compose(&self, request: &MontageRequest<'_>) -> Result<()>;
}

/// 以 ffprobe / ffmpeg / ImageMagick 實作的媒體工具
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffprobe_program: String,
    ffmpeg_program: String,
    montage_command: Vec<String>,
    timeout: Duration,
}

impl FfmpegTools {
    /// `montage_command` 可含參數，例如 `magick montage` 或 `montage`
    #[must_use]
    pub fn new(montage_command: &str, timeout: Duration) -> Self {
        let mut montage_command: Vec<String> = montage_command
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if montage_command.is_empty() {
            montage_command = vec!["magick".to_string(), "montage".to_string()];
        }

        Self {
            ffprobe_program: "ffprobe".to_string(),
            ffmpeg_program: "ffmpeg".to_string(),
            montage_command,
            timeout,
        }
    }

    fn run_tool(
        &self,
        command: &mut Command,
        program: &str,
        failure: impl Fn(String) -> ContactSheetError,
    ) -> Result<Output> {
        let output = run_with_timeout(command, self.timeout)
            .map_err(|e| failure(format!("無法執行 {program}: {e}")))?
            .ok_or_else(|| ContactSheetError::Timeout {
                program: program.to_string(),
                timeout: self.timeout,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("{program} 執行失敗: {}", stderr.trim())));
        }

        Ok(output)
    }
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self::new("magick montage", Duration::from_secs(120))
    }
}

impl MediaTools for FfmpegTools {
    fn probe(&self, path: &Path, selector: StreamSelector) -> Result<FfprobeOutput> {
        let mut command = Command::new(&self.ffprobe_program);
        command
            .args([
                "-v",
                "error",
                "-select_streams",
                selector.select_streams(),
                "-show_entries",
                selector.show_entries(),
                "-of",
                "json",
            ])
            .arg(path);

        let output = self.run_tool(&mut command, &self.ffprobe_program, |reason| {
            ContactSheetError::probe(path, reason)
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        FfprobeOutput::from_json(&stdout)
            .map_err(|e| ContactSheetError::probe(path, format!("無法解析 ffprobe 輸出: {e}")))
    }

    fn extract(&self, path: &Path, timestamp: f64, output_path: &Path) -> Result<()> {
        debug!("擷取畫格 {} @ {timestamp:.2}s", path.display());

        let mut command = Command::new(&self.ffmpeg_program);
        command
            .args(["-hide_banner", "-loglevel", "error", "-ss"])
            .arg(format!("{timestamp:.3}"))
            .arg("-i")
            .arg(path)
            .args(["-frames:v", "1", "-q:v", "2", "-y"])
            .arg(output_path);

        let failure = |reason| ContactSheetError::Extraction {
            path: path.to_path_buf(),
            timestamp,
            reason,
        };

        self.run_tool(&mut command, &self.ffmpeg_program, failure)?;

        if !output_path.exists() {
            return Err(failure(format!("畫格檔案未建立: {}", output_path.display())));
        }

        Ok(())
    }

    fn compose(&self, request: &MontageRequest<'_>) -> Result<()> {
        let (program, leading_args) = self
            .montage_command
            .split_first()
            .ok_or_else(|| ContactSheetError::Composition("未設定合併工具".to_string()))?;

        let mut command = Command::new(program);
        command
            .args(leading_args)
            .args(["-mode", "concatenate", "-tile"])
            .arg(&request.tile)
            .arg("-geometry")
            .arg(format!("+{}+{}", request.margin, request.margin))
            .args(["-background", "white", "-border"])
            .arg(request.border.to_string())
            .args(["-gravity", "West", "-pointsize"])
            .arg(request.point_size.to_string())
            .arg("-title")
            .arg(request.caption)
            .args(request.images)
            .arg(request.output_path);

        debug!(
            "合併 {} 張畫格為 {} 網格: {}",
            request.images.len(),
            request.tile,
            request.output_path.display()
        );

        self.run_tool(&mut command, program, ContactSheetError::Composition)?;

        if !request.output_path.exists() {
            return Err(ContactSheetError::Composition(format!(
                "預覽圖未建立: {}",
                request.output_path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_montage_command_split() {
        let tools = FfmpegTools::new("magick montage", Duration::from_secs(1));
        assert_eq!(tools.montage_command, vec!["magick", "montage"]);

        let tools = FfmpegTools::new("montage", Duration::from_secs(1));
        assert_eq!(tools.montage_command, vec!["montage"]);
    }

    #[test]
    fn test_empty_montage_command_falls_back() {
        let tools = FfmpegTools::new("   ", Duration::from_secs(1));
        assert_eq!(tools.montage_command, vec!["magick", "montage"]);
    }

    #[test]
    fn test_missing_probe_program_is_probe_error() {
        let mut tools = FfmpegTools::default();
        tools.ffprobe_program = "definitely-not-ffprobe-xyz".to_string();

        let result = tools.probe(Path::new("/nonexistent.mp4"), StreamSelector::Duration);
        assert!(matches!(result, Err(ContactSheetError::Probe { .. })));
    }

    #[test]
    fn test_missing_ffmpeg_program_is_extraction_error() {
        let mut tools = FfmpegTools::default();
        tools.ffmpeg_program = "definitely-not-ffmpeg-xyz".to_string();

        let result = tools.extract(
            Path::new("/nonexistent.mp4"),
            1.0,
            Path::new("/nonexistent/out.jpg"),
        );
        assert!(matches!(result, Err(ContactSheetError::Extraction { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_tool_is_timeout_error() {
        let tools = FfmpegTools::new("magick montage", Duration::from_millis(100));
        let mut command = Command::new("sleep");
        command.arg("5");

        let started = std::time::Instant::now();
        let result = tools.run_tool(&mut command, "sleep", |reason| {
            ContactSheetError::probe(Path::new("/slow.mp4"), reason)
        });

        assert!(matches!(
            result,
            Err(ContactSheetError::Timeout { ref program, timeout })
                if program == "sleep" && timeout == Duration::from_millis(100)
        ));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
