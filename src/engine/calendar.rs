// ==========================================
// 资源规划系统 - 日历月枚举
// ==========================================
// 职责: 给定全局日期跨度, 产出按月升序的聚合边界序列
// ==========================================

use chrono::{Datelike, NaiveDate};

/// 所在月份的1号
pub fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// 下个月的1号
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}

/// 所在月份的最后一天
pub fn month_end(date: NaiveDate) -> NaiveDate {
    next_month_start(date) - chrono::Duration::days(1)
}

/// 所在月份的天数 (28-31)
pub fn days_in_month(date: NaiveDate) -> i64 {
    (next_month_start(date) - month_floor(date)).num_days()
}

/// 枚举跨度内的所有月份 (每月1号, 升序, 两端取月后闭区间)
///
/// 例: min=2024-01-15, max=2024-03-02
///     → [2024-01-01, 2024-02-01, 2024-03-01]
///
/// 取月后 min > max 时返回空序列 (不报错); 调用方负责保证
/// 跨度来自真实记录的 min(start)/max(end), 正常情况下不会出现。
pub fn enumerate_months(min_date: NaiveDate, max_date: NaiveDate) -> Vec<NaiveDate> {
    let end_month = month_floor(max_date);
    let mut months = Vec::new();
    let mut current = month_floor(min_date);

    while current <= end_month {
        months.push(current);
        current = next_month_start(current);
    }

    months
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_floor_and_end() {
        assert_eq!(month_floor(d(2024, 2, 15)), d(2024, 2, 1));
        assert_eq!(month_end(d(2024, 2, 15)), d(2024, 2, 29)); // 闰年
        assert_eq!(month_end(d(2023, 2, 1)), d(2023, 2, 28));
        assert_eq!(month_end(d(2024, 12, 31)), d(2024, 12, 31));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(d(2024, 1, 10)), 31);
        assert_eq!(days_in_month(d(2024, 2, 10)), 29);
        assert_eq!(days_in_month(d(2023, 2, 10)), 28);
        assert_eq!(days_in_month(d(2024, 4, 30)), 30);
    }

    #[test]
    fn test_enumerate_months_basic() {
        let months = enumerate_months(d(2024, 1, 15), d(2024, 3, 2));
        assert_eq!(months, vec![d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);
    }

    #[test]
    fn test_enumerate_months_crosses_year() {
        let months = enumerate_months(d(2023, 11, 20), d(2024, 2, 1));
        assert_eq!(
            months,
            vec![d(2023, 11, 1), d(2023, 12, 1), d(2024, 1, 1), d(2024, 2, 1)]
        );
    }

    #[test]
    fn test_enumerate_months_single_month() {
        let months = enumerate_months(d(2024, 6, 5), d(2024, 6, 25));
        assert_eq!(months, vec![d(2024, 6, 1)]);
    }

    #[test]
    fn test_enumerate_months_inverted_span_is_empty() {
        // 取月后 min > max: 返回空序列而非报错
        assert!(enumerate_months(d(2024, 5, 1), d(2024, 3, 31)).is_empty());
    }

    #[test]
    fn test_enumerate_months_no_gaps_no_duplicates() {
        let months = enumerate_months(d(2022, 3, 17), d(2025, 8, 9));
        assert_eq!(months.len(), 42);

        for pair in months.windows(2) {
            assert_eq!(pair[1], next_month_start(pair[0])); // 相邻即连续
        }
    }
}
