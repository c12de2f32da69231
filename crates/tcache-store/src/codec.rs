//! 快取檔案編解碼

use std::io::{Read, Write};

use tcache_core::{BoxError, CacheOptions, FieldMap};

/// 欄位映射的編解碼器
///
/// 必須能遞迴處理巢狀結構（巢狀紀錄、數值、字串、布林）。
pub trait Codec {
    /// 將映射寫入輸出
    fn encode(&self, fields: &FieldMap, writer: &mut dyn Write) -> Result<(), BoxError>;

    /// 從輸入讀回映射
    fn decode(&self, reader: &mut dyn Read) -> Result<FieldMap, BoxError>;
}

/// JSON 編解碼器（serde_json）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 縮排輸出
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn from_options(options: &CacheOptions) -> Self {
        Self {
            pretty: options.pretty,
        }
    }
}

impl Codec for JsonCodec {
    fn encode(&self, fields: &FieldMap, writer: &mut dyn Write) -> Result<(), BoxError> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, fields)?;
        } else {
            serde_json::to_writer(writer, fields)?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<FieldMap, BoxError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
