//! Small shared utilities

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a human-facing order reference (bonnummer).
///
/// Layout: `B` + `yymmdd` + `-` + 4 random digits, e.g. `B260807-4821`.
/// Short enough to read over the phone; the date prefix keeps references
/// roughly sortable. Uniqueness is enforced at the repository layer — a
/// same-day collision (1/10000 per pair) is rejected there and the caller
/// retries with a fresh suffix.
pub fn generate_bonnummer() -> String {
    use rand::Rng;
    let date = chrono::Utc::now().format("%y%m%d");
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("B{}-{:04}", date, suffix)
}
