use std::sync::atomic::{AtomicI64, Ordering};

/// Last value handed out by [`unique_millis`]
static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 严格递增的毫秒时间戳
///
/// Same as [`now_millis`] except that two calls never return the same value:
/// a call landing in an already used millisecond gets the next one. Used for
/// `created_at` columns that are sort keys, so rows created back to back keep
/// their creation order.
pub fn unique_millis() -> i64 {
    let now = now_millis();
    let prev = LAST_STAMP
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(prev + 1)
}
