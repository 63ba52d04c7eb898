// ==========================================
// 资源规划系统 - 引擎层
// ==========================================
// 职责: 月度FTE聚合的三个环节
// - calendar: 月份枚举
// - apportion: 按天加权分摊
// - aggregation: 求和与整表替换
// ==========================================

pub mod aggregation;
pub mod apportion;
pub mod calendar;

// 重导出核心类型
pub use aggregation::{AggregationEngine, AggregationError, RecomputeResult};
pub use apportion::{apportioned_fte, month_fraction};
pub use calendar::{days_in_month, enumerate_months, month_end, month_floor};
