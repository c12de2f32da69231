//! # Typed Cache Store
//!
//! 檔案快取：建構時載入、存檔與清除

pub mod cache;
pub mod codec;
pub mod snapshot;

// Re-export 主要類型
pub use cache::Cached;
pub use codec::{Codec, JsonCodec};
pub use snapshot::Merged;
