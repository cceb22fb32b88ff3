use chrono::{DateTime, Utc};
use time::OffsetDateTime;

pub fn utc_to_offset(value: DateTime<Utc>) -> OffsetDateTime {
    let nanos = i128::from(value.timestamp_millis()).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn offset_to_utc(value: OffsetDateTime) -> DateTime<Utc> {
    let millis = i64::try_from(value.unix_timestamp_nanos() / 1_000_000).unwrap_or_default();
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_keeps_millisecond_precision() {
        let now = DateTime::from_timestamp_millis(1_760_000_123_456).expect("timestamp");
        assert_eq!(offset_to_utc(utc_to_offset(now)), now);
    }
}
