//! 紀錄抽象

use std::path::Path;

use crate::field::{FieldDescriptor, FieldValue};
use crate::{BoxError, Result};

/// 可快取的紀錄
///
/// 紀錄是一組固定、具名、具型別的欄位。其中一個欄位是快取檔案位置，
/// 其餘皆為資料欄位。快取檔案以 [`Record::FIELDS`] 中的名稱為鍵，
/// 每個資料欄位各自編解碼，位置欄位完全不經過序列化。
///
/// 一般透過 [`record!`](crate::record) 宣告；手動實作時需自行維護欄位清單，
/// 並讓 `encode_field`/`decode_field` 接受清單中的每個資料欄位名稱。
pub trait Record {
    /// 所有宣告欄位（含位置欄位）
    const FIELDS: &'static [FieldDescriptor];

    /// 快取檔案位置
    fn location(&self) -> Option<&Path>;

    /// 編碼單一資料欄位；不是資料欄位時回傳 `Ok(None)`
    fn encode_field(&self, name: &str) -> Result<Option<FieldValue>>;

    /// 以載入的值覆寫單一資料欄位；不是資料欄位時回傳 `Ok(false)`
    fn decode_field(&mut self, name: &str, value: FieldValue) -> std::result::Result<bool, BoxError>;

    /// 位置欄位的描述
    fn location_field() -> Option<&'static FieldDescriptor> {
        Self::FIELDS.iter().find(|field| field.is_location())
    }

    /// 依名稱查找欄位
    fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
        Self::FIELDS.iter().find(|field| field.name == name)
    }

    /// 檢查名稱是否為宣告的資料欄位
    fn is_data_field(name: &str) -> bool {
        Self::descriptor(name).is_some_and(FieldDescriptor::is_data)
    }

    /// 檢查名稱是否為位置欄位
    fn is_location_field(name: &str) -> bool {
        Self::descriptor(name).is_some_and(FieldDescriptor::is_location)
    }

    /// 所有資料欄位名稱（宣告順序）
    fn data_field_names() -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|field| field.is_data())
            .map(|field| field.name)
            .collect()
    }
}

/// 宣告可快取的紀錄
///
/// 所有欄位都會包成 `Option<T>`，`None` 代表未設定。
/// 標記 `#[location]` 的欄位必須是 `PathBuf`，保存快取檔案位置。
///
/// 巨集會自行 derive `Default`、`Serialize`、`Deserialize`（供巢狀使用），
/// 不要重複 derive。呼叫端需依賴 `serde`（含 `derive` feature）。
///
/// 快取檔案的鍵一律是欄位識別字（raw identifier 去掉 `r#`）。
/// `#[serde(rename)]`、`rename_all` 等屬性只影響紀錄被巢狀序列化時的形式，
/// 不會改變快取檔案的鍵。
///
/// ```
/// tcache_core::record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Progress {
///         #[location]
///         pub path: PathBuf,
///         pub step: u32,
///         pub label: String,
///     }
/// }
///
/// use tcache_core::Record;
///
/// let progress = Progress::at("/tmp/progress.pickle");
/// assert_eq!(progress.step, None);
/// assert_eq!(Progress::data_field_names(), vec!["step", "label"]);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            #[location]
            $(#[$loc_meta:meta])*
            $loc_vis:vis $loc:ident : PathBuf,
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        #[derive(Default, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $(#[$meta])*
        $vis struct $name {
            $(#[$loc_meta])*
            $loc_vis $loc: ::core::option::Option<::std::path::PathBuf>,
            $(
                $(#[$field_meta])*
                $field_vis $field: ::core::option::Option<$ty>,
            )*
        }

        impl $name {
            /// 以快取檔案位置建立紀錄，其餘欄位皆未設定
            #[allow(dead_code)]
            $vis fn at(location: impl ::core::convert::Into<::std::path::PathBuf>) -> Self {
                Self {
                    $loc: ::core::option::Option::Some(location.into()),
                    ..::core::default::Default::default()
                }
            }
        }

        impl $crate::Record for $name {
            const FIELDS: &'static [$crate::FieldDescriptor] = &[
                $crate::FieldDescriptor::location($crate::field::field_name(::core::stringify!($loc))),
                $(
                    $crate::FieldDescriptor::data(
                        $crate::field::field_name(::core::stringify!($field)),
                        ::core::stringify!($ty),
                    ),
                )*
            ];

            fn location(&self) -> ::core::option::Option<&::std::path::Path> {
                self.$loc.as_deref()
            }

            fn encode_field(
                &self,
                name: &str,
            ) -> $crate::Result<::core::option::Option<$crate::FieldValue>> {
                $(
                    if name == $crate::field::field_name(::core::stringify!($field)) {
                        return $crate::field::encode_value(
                            $crate::field::field_name(::core::stringify!($field)),
                            &self.$field,
                        )
                        .map(::core::option::Option::Some);
                    }
                )*
                let _ = name;
                ::core::result::Result::Ok(::core::option::Option::None)
            }

            fn decode_field(
                &mut self,
                name: &str,
                value: $crate::FieldValue,
            ) -> ::core::result::Result<bool, $crate::BoxError> {
                $(
                    if name == $crate::field::field_name(::core::stringify!($field)) {
                        $crate::field::decode_value(&mut self.$field, value)?;
                        return ::core::result::Result::Ok(true);
                    }
                )*
                let _ = (name, value);
                ::core::result::Result::Ok(false)
            }
        }
    };
}
