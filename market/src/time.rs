/// Current wall-clock time as Unix seconds.
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
