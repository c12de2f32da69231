//! 欄位描述與單一欄位編解碼

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{BoxError, CacheError, Result};

/// 單一欄位的值
pub type FieldValue = serde_json::Value;

/// 持久化的欄位映射（欄位名稱 → 值）
pub type FieldMap = serde_json::Map<String, FieldValue>;

/// 欄位角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    /// 快取檔案位置，不會被持久化
    Location,
    /// 一般資料欄位
    Data,
}

/// 宣告欄位的靜態描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// 欄位名稱，也是快取檔案中的鍵
    pub name: &'static str,

    /// 宣告的型別名稱（僅供診斷）
    pub type_name: &'static str,

    /// 欄位角色
    pub role: FieldRole,
}

impl FieldDescriptor {
    /// 描述一般資料欄位
    pub const fn data(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            role: FieldRole::Data,
        }
    }

    /// 描述位置欄位
    pub const fn location(name: &'static str) -> Self {
        Self {
            name,
            type_name: "PathBuf",
            role: FieldRole::Location,
        }
    }

    pub fn is_location(&self) -> bool {
        self.role == FieldRole::Location
    }

    pub fn is_data(&self) -> bool {
        self.role == FieldRole::Data
    }
}

/// 由識別字取得欄位名稱（去掉 raw identifier 的 `r#` 前綴）
pub const fn field_name(ident: &'static str) -> &'static str {
    let bytes = ident.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'r' && bytes[1] == b'#' {
        let (_, rest) = bytes.split_at(2);
        match core::str::from_utf8(rest) {
            Ok(name) => name,
            Err(_) => ident,
        }
    } else {
        ident
    }
}

/// 編碼單一欄位
///
/// 已設定的值若被編碼成 `null`（例如 NaN、無限大），回傳錯誤而不是
/// 靜默地寫成未設定。
pub fn encode_value<T: Serialize>(name: &'static str, value: &Option<T>) -> Result<FieldValue> {
    let encoded = serde_json::to_value(value).map_err(CacheError::encode)?;
    if value.is_some() && encoded.is_null() {
        return Err(CacheError::Unrepresentable(name));
    }
    Ok(encoded)
}

/// 以載入的值覆寫單一欄位
pub fn decode_value<T: DeserializeOwned>(
    slot: &mut Option<T>,
    value: FieldValue,
) -> std::result::Result<(), BoxError> {
    *slot = serde_json::from_value(value)?;
    Ok(())
}
