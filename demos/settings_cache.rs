//! 紀錄快取示例
//!
//! 執行：`cargo run --example settings_cache -- [快取檔案路徑]`
//! 以 `RUST_LOG=debug` 查看載入與存檔的日誌。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use typed_cache::{record, Cached, CacheOptions};

record! {
    #[derive(Debug, Clone)]
    pub struct PlannerSettings {
        #[location]
        pub path: PathBuf,
        pub plant_id: String,
        pub horizon_days: u32,
        pub safety_stock: Decimal,
        pub last_run: NaiveDate,
        pub runs: u64,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== 紀錄快取示例 ===\n");

    let location = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("typed-cache-demo").join("settings.pickle"));

    let options = CacheOptions::new().with_pretty(true);
    let mut settings = Cached::open_with(PlannerSettings::at(&location), options)?;

    if settings.exists() {
        println!("已從 {} 載入:", location.display());
    } else {
        println!("快取不存在，使用預設值");
    }
    println!("  {:?}\n", settings.record());

    settings.plant_id.get_or_insert_with(|| "PLANT-01".to_string());
    settings.horizon_days.get_or_insert(90);
    settings.safety_stock.get_or_insert(Decimal::from(10));
    settings.last_run = NaiveDate::from_ymd_opt(2025, 11, 1);
    settings.runs = Some(settings.runs.unwrap_or(0) + 1);
    settings.save()?;

    println!("已寫入 {}（第 {} 次執行）", location.display(), settings.runs.unwrap_or(0));

    if std::env::var_os("TYPED_CACHE_DEMO_CLEAR").is_some() {
        settings.clear()?;
        println!("已刪除快取檔案");
    }

    Ok(())
}
