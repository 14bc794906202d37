use chrono::{DateTime, FixedOffset, Offset, Utc};

/// JST is UTC+9
const JST_OFFSET_SECONDS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    Utc::now().with_timezone(&jst()).timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as an RFC 3339 string in JST.
///
/// Out-of-range timestamps yield an empty string.
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&jst()).to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_jst_timestamp_is_recent() {
        // テスト項目: 現在時刻のミリ秒タイムスタンプが取得できる
        // when (操作):
        let before = Utc::now().timestamp_millis();
        let now = get_jst_timestamp();
        let after = Utc::now().timestamp_millis();

        // then (期待する結果):
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339() {
        // テスト項目: エポックが JST の RFC 3339 文字列に変換される
        // when (操作):
        let formatted = timestamp_to_jst_rfc3339(0);

        // then (期待する結果):
        assert_eq!(formatted, "1970-01-01T09:00:00+09:00");
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_out_of_range() {
        // テスト項目: 範囲外のタイムスタンプは空文字列になる
        // then (期待する結果):
        assert_eq!(timestamp_to_jst_rfc3339(i64::MAX), "");
    }
}
