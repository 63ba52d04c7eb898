// ==========================================
// 资源规划系统 - 月度聚合领域模型
// ==========================================
// 用途: monthly_demand_allocation 表的行映射
// 不变量: year_month 为当月1号, 活跃区间内每月一行, 无重复无空洞
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// MonthlyAggregate - 月度需求/分配聚合
// ==========================================
// 生命周期: 每次重算整表替换, 不做增量更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    // ===== 主键 =====
    pub year_month: NaiveDate,   // 当月1号 (唯一键)

    // ===== 聚合值 =====
    pub demand_fte: f64,         // 当月需求FTE合计 (>= 0)
    pub allocation_fte: f64,     // 当月分配FTE合计 (>= 0)
    pub capacity_fte: f64,       // 容量FTE (当前总人数快照, 各月相同)
}

impl MonthlyAggregate {
    /// 需求缺口 (需求 - 分配)
    pub fn gap_fte(&self) -> f64 {
        self.demand_fte - self.allocation_fte
    }

    /// 容量利用率 (分配 / 容量), 容量为0时返回0
    pub fn utilization(&self) -> f64 {
        if self.capacity_fte <= 0.0 {
            return 0.0;
        }
        self.allocation_fte / self.capacity_fte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(demand: f64, allocation: f64, capacity: f64) -> MonthlyAggregate {
        MonthlyAggregate {
            year_month: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            demand_fte: demand,
            allocation_fte: allocation,
            capacity_fte: capacity,
        }
    }

    #[test]
    fn test_gap_fte() {
        assert!((row(2.0, 0.5, 4.0).gap_fte() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_utilization_handles_zero_capacity() {
        assert!((row(1.0, 2.0, 4.0).utilization() - 0.5).abs() < 1e-9);
        assert_eq!(row(1.0, 2.0, 0.0).utilization(), 0.0);
    }
}
