//! 序列化過濾：存檔快照與載入合併

use std::path::Path;

use tcache_core::{CacheError, FieldMap, Record, Result};

/// 合併結果
#[derive(Debug)]
pub struct Merged<R> {
    /// 套用載入值後的紀錄
    pub record: R,

    /// 未宣告的鍵（不會再被寫回）
    pub extras: FieldMap,

    /// 實際覆寫的資料欄位
    pub applied: Vec<String>,
}

/// 建立存檔用的欄位映射
///
/// 逐一編碼宣告的資料欄位，位置欄位不會被序列化。
/// 未設定的欄位以 `null` 寫出；無法表示的值（NaN、無限大）回傳錯誤。
pub fn snapshot<R: Record>(record: &R) -> Result<FieldMap> {
    let mut fields = FieldMap::new();
    for field in R::FIELDS.iter().filter(|field| field.is_data()) {
        if let Some(value) = record.encode_field(field.name)? {
            fields.insert(field.name.to_string(), value);
        }
    }
    Ok(fields)
}

/// 將載入的映射合併進紀錄
///
/// - 資料欄位：覆寫
/// - 位置欄位：忽略（檔案內容不能改變快取位置）
/// - 其他鍵：放進 extras
///
/// 只有映射中出現的欄位會被改寫，其餘欄位維持原值。
/// 值的型別與宣告不符時回傳解碼錯誤。
pub fn merge<R: Record>(mut record: R, loaded: FieldMap, path: &Path) -> Result<Merged<R>> {
    let mut extras = FieldMap::new();
    let mut applied = Vec::new();

    for (name, value) in loaded {
        if R::is_data_field(&name) {
            let decoded = record
                .decode_field(&name, value)
                .map_err(|err| CacheError::decode(path, err))?;
            if decoded {
                applied.push(name);
            }
        } else if R::is_location_field(&name) {
            tracing::warn!("快取檔案 {} 含有位置欄位 '{}'，已忽略", path.display(), name);
        } else {
            tracing::debug!("未宣告的欄位 '{}' 放入 extras", name);
            extras.insert(name, value);
        }
    }

    Ok(Merged {
        record,
        extras,
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tcache_core::ErrorKind;

    tcache_core::record! {
        #[derive(Debug, Clone, PartialEq)]
        struct TestData {
            #[location]
            path: PathBuf,
            a: i64,
            b: f64,
            c: String,
            d: bool,
        }
    }

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_snapshot_excludes_location() {
        let mut data = TestData::at("/tmp/cache.pickle");
        data.a = Some(42);

        let snap = snapshot(&data).unwrap();
        assert!(!snap.contains_key("path"));
        assert_eq!(snap.get("a"), Some(&json!(42)));
        // 未設定的欄位也會寫出
        assert_eq!(snap.get("b"), Some(&Value::Null));
        assert_eq!(snap.len(), 4);
    }

    #[test]
    fn test_merge_partial() {
        let loaded = fields(json!({"a": 100, "c": "partial"}));
        let merged = merge(TestData::at("/tmp/cache.pickle"), loaded, Path::new("x")).unwrap();

        assert_eq!(merged.record.a, Some(100));
        assert_eq!(merged.record.b, None);
        assert_eq!(merged.record.c.as_deref(), Some("partial"));
        assert_eq!(merged.record.d, None);
        assert_eq!(merged.applied, vec!["a".to_string(), "c".to_string()]);
        assert!(merged.extras.is_empty());
    }

    #[test]
    fn test_merge_keeps_constructed_values() {
        let mut data = TestData::at("/tmp/cache.pickle");
        data.b = Some(1.5);
        data.d = Some(true);

        let merged = merge(data, fields(json!({"a": 1})), Path::new("x")).unwrap();
        assert_eq!(merged.record.a, Some(1));
        assert_eq!(merged.record.b, Some(1.5));
        assert_eq!(merged.record.d, Some(true));
    }

    #[test]
    fn test_merge_routes_unknown_keys_to_extras() {
        let loaded = fields(json!({"x": 123, "y": "abc"}));
        let merged = merge(TestData::at("/tmp/cache.pickle"), loaded, Path::new("x")).unwrap();

        assert_eq!(merged.extras.get("x"), Some(&json!(123)));
        assert_eq!(merged.extras.get("y"), Some(&json!("abc")));
        assert!(merged.applied.is_empty());
        assert_eq!(merged.record, TestData::at("/tmp/cache.pickle"));
    }

    #[test]
    fn test_merge_ignores_location_key() {
        let loaded = fields(json!({"path": "/elsewhere/other.pickle", "a": 5}));
        let merged = merge(TestData::at("/tmp/cache.pickle"), loaded, Path::new("x")).unwrap();

        assert_eq!(merged.record.path, Some(PathBuf::from("/tmp/cache.pickle")));
        assert_eq!(merged.record.a, Some(5));
        assert!(!merged.extras.contains_key("path"));
    }

    #[test]
    fn test_merge_type_mismatch() {
        let loaded = fields(json!({"a": "not a number"}));
        let err = merge(TestData::at("/tmp/cache.pickle"), loaded, Path::new("bad.pickle"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }

    #[test]
    fn test_merge_null_unsets_field() {
        let mut data = TestData::at("/tmp/cache.pickle");
        data.a = Some(9);

        let merged = merge(data, fields(json!({"a": null})), Path::new("x")).unwrap();
        assert_eq!(merged.record.a, None);
    }

    #[test]
    fn test_merge_leaves_unloaded_fields_untouched() {
        let mut data = TestData::at("/tmp/cache.pickle");
        data.b = Some(f64::NAN);

        let merged = merge(data, fields(json!({"a": 1})), Path::new("x")).unwrap();
        assert_eq!(merged.record.a, Some(1));
        assert!(merged.record.b.unwrap().is_nan());
    }

    #[test]
    fn test_snapshot_rejects_non_finite_float() {
        let mut data = TestData::at("/tmp/cache.pickle");
        data.b = Some(f64::INFINITY);

        let err = snapshot(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_location_is_never_serialized() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let location = PathBuf::from(OsStr::from_bytes(b"/tmp/caf\xe9.pickle"));
        let mut data = TestData::at(&location);
        data.a = Some(1);

        let snap = snapshot(&data).unwrap();
        assert_eq!(snap.get("a"), Some(&json!(1)));

        let merged = merge(data, fields(json!({"c": "x"})), &location).unwrap();
        assert_eq!(merged.record.path, Some(location));
    }

    proptest! {
        #[test]
        fn prop_snapshot_only_has_data_fields(
            location in "/[a-z]{1,8}/[a-z]{1,8}\\.pickle",
            a in proptest::option::of(any::<i64>()),
            c in proptest::option::of("[a-z ]{0,16}"),
        ) {
            let mut data = TestData::at(&location);
            data.a = a;
            data.c = c;

            let snap = snapshot(&data).unwrap();
            prop_assert!(!snap.contains_key("path"));
            let keys: Vec<_> = snap.keys().map(String::as_str).collect();
            prop_assert_eq!(keys, vec!["a", "b", "c", "d"]);
        }
    }
}
