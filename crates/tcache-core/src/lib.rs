//! # Typed Cache Core
//!
//! 紀錄模型、欄位描述與錯誤類型定義

pub mod config;
pub mod field;
pub mod record;

use std::path::PathBuf;

// Re-export 主要類型
pub use config::CacheOptions;
pub use field::{FieldDescriptor, FieldMap, FieldRole, FieldValue};
pub use record::Record;

/// 編解碼器回傳的底層錯誤
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 快取錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("快取檔案必須帶有 '{}' 副檔名: {}", .suffix, .path.display())]
    InvalidLocation { path: PathBuf, suffix: String },

    #[error("紀錄未設定快取檔案位置")]
    MissingLocation,

    #[error("'{0}' 是宣告欄位，請直接設置紀錄欄位")]
    DeclaredField(String),

    #[error("快取檔案讀寫失敗 {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("快取內容無法解碼 {}: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("欄位值無法編碼: {0}")]
    Encode(#[source] BoxError),

    #[error("欄位 '{0}' 的值無法表示（例如 NaN 或無限大）")]
    Unrepresentable(&'static str),
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 配置或使用錯誤
    Configuration,
    /// 檔案內容無法解碼
    Deserialization,
    /// 欄位值無法編碼
    Serialization,
    /// 檔案系統錯誤
    Filesystem,
}

impl CacheError {
    /// 建構 I/O 錯誤
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 建構解碼錯誤
    pub fn decode(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 建構編碼錯誤
    pub fn encode(source: impl Into<BoxError>) -> Self {
        Self::Encode(source.into())
    }

    /// 錯誤所屬分類
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLocation { .. } | Self::MissingLocation | Self::DeclaredField(_) => {
                ErrorKind::Configuration
            }
            Self::Decode { .. } => ErrorKind::Deserialization,
            Self::Encode(_) | Self::Unrepresentable(_) => ErrorKind::Serialization,
            Self::Io { .. } => ErrorKind::Filesystem,
        }
    }

    /// 是否為輸入提前結束（空檔案或截斷）
    pub fn is_eof(&self) -> bool {
        let Self::Decode { source, .. } = self else {
            return false;
        };

        if let Some(err) = source.downcast_ref::<serde_json::Error>() {
            return err.is_eof();
        }
        source
            .downcast_ref::<std::io::Error>()
            .is_some_and(|err| err.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
