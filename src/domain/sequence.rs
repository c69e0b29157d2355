use chrono::NaiveDate;

pub const ORDER_SCOPE: &str = "ORD";
pub const TRANSACTION_SCOPE: &str = "TRX";

/// Human-readable date-scoped references: `ORD-20250101-00001`,
/// `TRX-20250101-00001`. The counter value comes from the
/// `daily_sequences` table, one atomic increment per draw.
pub fn format_reference(scope: &str, date: NaiveDate, value: i32) -> String {
    format!("{}-{}-{:05}", scope, date.format("%Y%m%d"), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_order_of_the_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(format_reference(ORDER_SCOPE, date, 1), "ORD-20250101-00001");
    }

    #[test]
    fn second_order_of_the_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(format_reference(ORDER_SCOPE, date, 2), "ORD-20250101-00002");
    }

    #[test]
    fn transaction_scope_and_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(
            format_reference(TRANSACTION_SCOPE, date, 12345),
            "TRX-20251231-12345"
        );
    }
}
