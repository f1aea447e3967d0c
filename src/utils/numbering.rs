//! 单据编号
//!
//! 收据号 `RCP-000001`，证书号 `CERT-20250301-0001`。新编号在事务中
//! 锁定最近一条记录后，取其数字后缀加一。

use chrono::NaiveDate;

pub const RECEIPT_PREFIX: &str = "RCP";
pub const CERTIFICATE_PREFIX: &str = "CERT";

/// 解析编号最后一段的数字后缀
pub fn parse_sequence_suffix(number: &str) -> Option<i64> {
    number
        .rsplit('-')
        .next()
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .and_then(|s| s.parse::<i64>().ok())
}

/// 根据上一条编号得到下一个序号，无法解析时从 1 开始
pub fn next_sequence(last: Option<&str>) -> i64 {
    last.and_then(parse_sequence_suffix).unwrap_or(0) + 1
}

pub fn format_receipt_no(sequence: i64) -> String {
    format!("{RECEIPT_PREFIX}-{sequence:06}")
}

pub fn format_certificate_no(issue_date: NaiveDate, sequence: i64) -> String {
    format!(
        "{CERTIFICATE_PREFIX}-{}-{sequence:04}",
        issue_date.format("%Y%m%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence_suffix() {
        assert_eq!(parse_sequence_suffix("RCP-000042"), Some(42));
        assert_eq!(parse_sequence_suffix("CERT-20250301-0007"), Some(7));
        assert_eq!(parse_sequence_suffix("RCP-"), None);
        assert_eq!(parse_sequence_suffix("legacy"), None);
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some("RCP-000009")), 10);
        assert_eq!(next_sequence(Some("CERT-20241231-0099")), 100);
        assert_eq!(next_sequence(Some("broken-x")), 1);
    }

    #[test]
    fn test_formats() {
        assert_eq!(format_receipt_no(1), "RCP-000001");
        assert_eq!(format_receipt_no(1234567), "RCP-1234567");
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(format_certificate_no(date, 12), "CERT-20250301-0012");
    }
}
