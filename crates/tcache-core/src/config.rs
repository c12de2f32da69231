//! 快取配置

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 預設的快取檔案副檔名
pub const DEFAULT_SUFFIX: &str = ".pickle";

/// 快取配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// 快取檔案路徑必須具備的結尾
    pub required_suffix: String,

    /// 是否以縮排格式寫出（方便人工檢查）
    pub pretty: bool,
}

impl CacheOptions {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            required_suffix: DEFAULT_SUFFIX.to_string(),
            pretty: false,
        }
    }

    /// 建構器模式：設置必要副檔名
    pub fn with_required_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.required_suffix = suffix.into();
        self
    }

    /// 建構器模式：設置縮排輸出
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn required_suffix(&self) -> &str {
        &self.required_suffix
    }

    /// 檢查路徑字串是否以必要副檔名結尾
    ///
    /// 比對的是路徑的字串形式，而非 `Path::extension`，
    /// 因此 `".tar.pickle"` 這類多段副檔名也能正確判斷。
    pub fn accepts(&self, path: &Path) -> bool {
        path.to_string_lossy().ends_with(self.required_suffix.as_str())
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new()
    }
}
