use chrono::{NaiveDateTime, Utc};

/// 응답에 쓰는 시각 형식
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// DB에 저장하는 현재 시각 (UTC)
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn format_iso(dt: &NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn should_format_without_fraction() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 26)
            .unwrap()
            .and_hms_milli_opt(15, 0, 1, 250)
            .unwrap();

        assert_eq!(format_iso(&dt), "2026-01-26T15:00:01");
    }
}
