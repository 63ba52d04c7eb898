// ==========================================
// 资源规划系统 - 月度FTE分摊
// ==========================================
// 职责: 计算一条区间记录在某个日历月内的按天加权FTE份额
// 算法: overlap_days / days_in_month, 闭区间按天计数
// 约束: 本层不做任何舍入, 舍入只发生在展示层
// ==========================================

use crate::engine::calendar::{days_in_month, month_end, month_floor};
use chrono::NaiveDate;

/// 记录区间与 month_start 所在月份的重叠比例 [0, 1]
///
/// 每个月独立推导自己的重叠区间, 记录跨几个月互不影响:
/// 只覆盖3月前半月的记录对3月贡献一半, 与其余月份无关。
pub fn month_fraction(
    record_start: NaiveDate,
    record_end: NaiveDate,
    month_start: NaiveDate,
) -> f64 {
    let month_first = month_floor(month_start);
    let month_last = month_end(month_start);

    let overlap_start = record_start.max(month_first);
    let overlap_end = record_end.min(month_last);

    if overlap_start > overlap_end {
        return 0.0;
    }

    // 闭区间: 首尾两天都计入
    let overlap_days = (overlap_end - overlap_start).num_days() + 1;

    overlap_days as f64 / days_in_month(month_first) as f64
}

/// 记录在 month_start 所在月份应分摊的FTE量 (>= 0)
pub fn apportioned_fte(
    fte: f64,
    record_start: NaiveDate,
    record_end: NaiveDate,
    month_start: NaiveDate,
) -> f64 {
    fte * month_fraction(record_start, record_end, month_start)
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calendar::enumerate_months;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const EPS: f64 = 1e-9;

    #[test]
    fn test_record_covers_full_month() {
        // 恰好覆盖整月: 比例精确为1.0
        let f = month_fraction(d(2024, 2, 1), d(2024, 2, 29), d(2024, 2, 1));
        assert!((f - 1.0).abs() < EPS);

        let fte = apportioned_fte(1.5, d(2024, 2, 1), d(2024, 2, 29), d(2024, 2, 1));
        assert!((fte - 1.5).abs() < EPS);
    }

    #[test]
    fn test_disjoint_record_contributes_zero() {
        let f = month_fraction(d(2024, 4, 1), d(2024, 4, 30), d(2024, 2, 1));
        assert_eq!(f, 0.0);
    }

    #[test]
    fn test_half_of_march() {
        // 3月1日-16日, 16/31天
        let f = month_fraction(d(2024, 3, 1), d(2024, 3, 16), d(2024, 3, 1));
        assert!((f - 16.0 / 31.0).abs() < EPS);
    }

    #[test]
    fn test_single_day_record() {
        // 单日记录: 30天月份里占 1/30
        let fte = apportioned_fte(1.0, d(2024, 6, 10), d(2024, 6, 10), d(2024, 6, 1));
        assert!((fte - 1.0 / 30.0).abs() < EPS);
    }

    #[test]
    fn test_mid_month_start_open_ended_tail() {
        // 记录从1月中旬起一直延续, 每个月只用自己的天数分摊
        let start = d(2024, 1, 10);
        let end = d(2024, 12, 31);

        let jan = month_fraction(start, end, d(2024, 1, 1));
        assert!((jan - 22.0 / 31.0).abs() < EPS);

        let feb = month_fraction(start, end, d(2024, 2, 1));
        assert!((feb - 1.0).abs() < EPS);
    }

    #[test]
    fn test_fraction_is_contained_in_record_month_only() {
        // 完全落在一个月内的记录: 该月按天分摊, 其余月份为0
        let start = d(2024, 5, 6);
        let end = d(2024, 5, 15);

        let may = apportioned_fte(2.0, start, end, d(2024, 5, 1));
        assert!((may - 2.0 * 10.0 / 31.0).abs() < EPS);

        assert_eq!(apportioned_fte(2.0, start, end, d(2024, 4, 1)), 0.0);
        assert_eq!(apportioned_fte(2.0, start, end, d(2024, 6, 1)), 0.0);
    }

    #[test]
    fn test_no_fte_lost_across_month_boundaries() {
        // 跨月记录在整个跨度上的分摊之和 ≈ fte × 覆盖的月份数当量
        let start = d(2024, 1, 1);
        let end = d(2024, 3, 31); // 整3个月
        let total: f64 = enumerate_months(start, end)
            .into_iter()
            .map(|m| apportioned_fte(0.8, start, end, m))
            .sum();
        assert!((total - 0.8 * 3.0).abs() < EPS);
    }

    #[test]
    fn test_partial_span_conserves_day_weights() {
        // 1月10日 - 2月20日: 22/31 + 20/29
        let start = d(2024, 1, 10);
        let end = d(2024, 2, 20);
        let total: f64 = enumerate_months(start, end)
            .into_iter()
            .map(|m| apportioned_fte(1.0, start, end, m))
            .sum();
        assert!((total - (22.0 / 31.0 + 20.0 / 29.0)).abs() < EPS);
    }
}
