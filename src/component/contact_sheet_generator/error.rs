use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 預覽圖流程的錯誤類型
///
/// 探測、解析與擷取錯誤只影響單一影片（或單一畫格），
/// 只有來源資料夾無法讀取時才會中止整個批次。
#[derive(Debug, Error)]
pub enum ContactSheetError {
    /// 影片資訊缺失或無法讀取（沒有長度、沒有串流、ffprobe 失敗）
    #[error("無法探測影片資訊 {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    /// 幀率字串格式錯誤或分母為零
    #[error("無法解析幀率 `{input}`: {reason}")]
    Parse { input: String, reason: String },

    /// 單一畫格擷取失敗
    #[error("畫格擷取失敗 {path} @ {timestamp:.2}s: {reason}")]
    Extraction {
        path: PathBuf,
        timestamp: f64,
        reason: String,
    },

    /// 合併工具失敗，或畫格數量與網格不符
    #[error("合併預覽圖失敗: {0}")]
    Composition(String),

    /// 資料夾無法讀取、無法建立等檔案系統錯誤
    #[error("檔案系統錯誤 {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 外部工具超過時間限制，已被終止
    #[error("{program} 執行逾時（{timeout:?}）")]
    Timeout { program: String, timeout: Duration },
}

impl ContactSheetError {
    pub fn probe(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ContactSheetError> = std::result::Result<T, E>;
