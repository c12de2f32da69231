//! 檔案快取紀錄

use serde::Serialize;
use std::fs;
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use tcache_core::{CacheError, CacheOptions, FieldMap, FieldValue, Record, Result};

use crate::codec::{Codec, JsonCodec};
use crate::snapshot::{self, Merged};

/// 以單一檔案持久化的紀錄
///
/// 建構時自動載入快取檔案，之後由呼叫端直接修改欄位（透過 `Deref`），
/// 再以 [`Cached::save`] 寫回或 [`Cached::clear`] 刪除檔案。
///
/// 載入時遇到的未宣告鍵保存在 extras 中，可以讀取，但永遠不會寫回檔案。
#[derive(Debug)]
pub struct Cached<R, C = JsonCodec> {
    record: R,
    extras: FieldMap,
    options: CacheOptions,
    codec: C,
}

impl<R: Record> Cached<R> {
    /// 以預設配置建構並載入
    pub fn open(record: R) -> Result<Self> {
        Self::open_with(record, CacheOptions::default())
    }

    /// 以指定配置建構並載入
    pub fn open_with(record: R, options: CacheOptions) -> Result<Self> {
        let codec = JsonCodec::from_options(&options);
        Self::open_with_codec(record, options, codec)
    }
}

impl<R: Record, C: Codec> Cached<R, C> {
    /// 以指定配置與編解碼器建構並載入
    ///
    /// 位置不符合副檔名要求時，在任何檔案操作之前就回傳錯誤。
    /// 檔案不存在時保留傳入的欄位值。
    pub fn open_with_codec(record: R, options: CacheOptions, codec: C) -> Result<Self> {
        if let Some(path) = record.location() {
            if !options.accepts(path) {
                return Err(CacheError::InvalidLocation {
                    path: path.to_path_buf(),
                    suffix: options.required_suffix.clone(),
                });
            }
        }

        let (record, extras) = load(record, &codec)?;
        Ok(Self {
            record,
            extras,
            options,
            codec,
        })
    }

    /// 將所有資料欄位寫入快取檔案
    ///
    /// 位置欄位與 extras 不會寫出。上層目錄不存在時會自動建立，
    /// 既有檔案會被整個覆寫。
    ///
    /// 先在記憶體中完成編碼，編碼失敗時既有的快取檔案保持不變。
    pub fn save(&self) -> Result<()> {
        let path = self.record.location().ok_or(CacheError::MissingLocation)?;
        let fields = snapshot::snapshot(&self.record)?;

        let mut bytes = Vec::new();
        self.codec
            .encode(&fields, &mut bytes)
            .map_err(CacheError::encode)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| CacheError::io(parent, err))?;
        }
        fs::write(path, &bytes).map_err(|err| CacheError::io(path, err))?;

        tracing::info!("已寫入快取 {}：{} 個欄位", path.display(), fields.len());
        Ok(())
    }

    /// 刪除快取檔案
    ///
    /// 檔案不存在視為成功。記憶體中的欄位值不受影響。
    pub fn clear(&self) -> Result<()> {
        let Some(path) = self.record.location() else {
            return Ok(());
        };

        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("已刪除快取 {}", path.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("快取檔案不存在，略過刪除: {}", path.display());
                Ok(())
            }
            Err(err) => Err(CacheError::io(path, err)),
        }
    }

    /// 快取檔案是否存在
    pub fn exists(&self) -> bool {
        self.record.location().is_some_and(Path::exists)
    }

    pub fn location(&self) -> Option<&Path> {
        self.record.location()
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn into_inner(self) -> R {
        self.record
    }

    /// 載入時取得的未宣告欄位
    pub fn extras(&self) -> &FieldMap {
        &self.extras
    }

    pub fn extra(&self, name: &str) -> Option<&FieldValue> {
        self.extras.get(name)
    }

    /// 設置未宣告欄位（僅存在於記憶體）
    ///
    /// 名稱與宣告欄位衝突時，應直接修改紀錄本身，這裡不會接受。
    pub fn set_extra(&mut self, name: impl Into<String>, value: impl Serialize) -> Result<()> {
        let name = name.into();
        if R::descriptor(&name).is_some() {
            return Err(CacheError::DeclaredField(name));
        }
        let value = serde_json::to_value(value).map_err(CacheError::encode)?;
        self.extras.insert(name, value);
        Ok(())
    }

    pub fn remove_extra(&mut self, name: &str) -> Option<FieldValue> {
        self.extras.remove(name)
    }

    /// 依名稱讀取欄位目前的值
    ///
    /// 資料欄位優先，其次是 extras。位置欄位不經由此處讀取。
    pub fn field(&self, name: &str) -> Result<Option<FieldValue>> {
        if R::is_data_field(name) {
            return self.record.encode_field(name);
        }
        Ok(self.extras.get(name).cloned())
    }
}

/// 讀取快取檔案並合併進紀錄，回傳紀錄與未宣告欄位
fn load<R: Record, C: Codec>(record: R, codec: &C) -> Result<(R, FieldMap)> {
    let Some(path) = record.location().map(Path::to_path_buf) else {
        tracing::debug!("紀錄未設定快取位置，使用預設值");
        return Ok((record, FieldMap::new()));
    };
    if !path.exists() {
        tracing::debug!("快取檔案不存在，使用預設值: {}", path.display());
        return Ok((record, FieldMap::new()));
    }

    let bytes = fs::read(&path).map_err(|err| CacheError::io(&path, err))?;
    let loaded = codec
        .decode(&mut bytes.as_slice())
        .map_err(|err| CacheError::decode(&path, err))?;

    let Merged {
        record,
        extras,
        applied,
    } = snapshot::merge(record, loaded, &path)?;

    tracing::info!(
        "已載入快取 {}：覆寫 {} 個欄位，{} 個未宣告欄位",
        path.display(),
        applied.len(),
        extras.len()
    );
    Ok((record, extras))
}

impl<R, C> Deref for Cached<R, C> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.record
    }
}

impl<R, C> DerefMut for Cached<R, C> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.record
    }
}
