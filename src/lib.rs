//! # Typed Cache
//!
//! 以單一檔案持久化的具型別紀錄快取
//!
//! ```no_run
//! use typed_cache::{record, Cached};
//!
//! record! {
//!     #[derive(Debug)]
//!     pub struct Session {
//!         #[location]
//!         pub path: PathBuf,
//!         pub user: String,
//!         pub visits: u32,
//!     }
//! }
//!
//! # fn main() -> typed_cache::Result<()> {
//! let mut session = Cached::open(Session::at("/tmp/session.pickle"))?;
//! session.visits = Some(session.visits.unwrap_or(0) + 1);
//! session.save()?;
//! # Ok(())
//! # }
//! ```

pub use tcache_core::{
    config, field, record, BoxError, CacheError, CacheOptions, ErrorKind, FieldDescriptor,
    FieldMap, FieldRole, FieldValue, Record, Result,
};
pub use tcache_store::{snapshot, Cached, Codec, JsonCodec, Merged};
