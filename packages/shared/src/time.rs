//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_jst_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_jst_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Manually driven clock for tests.
///
/// Returns the same instant until [`FixedClock::advance`] is called.
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(fixed_time_millis),
        }
    }

    /// Move the clock forward by `delta_millis`.
    pub fn advance(&self, delta_millis: i64) {
        self.millis.fetch_add(delta_millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_jst_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

fn jst() -> FixedOffset {
    // 9h is always within the valid offset range
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format.
///
/// Out-of-range values render as the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    jst()
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::default().with_timezone(&jst()))
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_jst_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // テスト項目: FixedClock が固定されたタイムスタンプを返す
        // given (前提条件):
        let clock = FixedClock::new(1234567890123);

        // when (操作):
        let first = clock.now_jst_millis();
        let second = clock.now_jst_millis();

        // then (期待する結果):
        assert_eq!(first, 1234567890123);
        assert_eq!(second, 1234567890123);
    }

    #[test]
    fn test_fixed_clock_advance() {
        // テスト項目: advance で時刻を進められる
        // given (前提条件):
        let clock = FixedClock::new(1000);

        // when (操作):
        clock.advance(250);

        // then (期待する結果):
        assert_eq!(clock.now_jst_millis(), 1250);
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_format() {
        // テスト項目: タイムスタンプが正しく RFC 3339 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00 JST in milliseconds
        let timestamp = 1672498800123;

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.starts_with("2023-01-01T00:00:00.123"));
        assert!(result.ends_with("+09:00"));
    }
}
