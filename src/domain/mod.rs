// ==========================================
// 资源规划系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与业务规则接口
// 红线: 不含数据访问逻辑, 不含聚合逻辑
// ==========================================

pub mod aggregate;
pub mod person;
pub mod records;

// 重导出核心类型
pub use aggregate::MonthlyAggregate;
pub use person::Person;
pub use records::{AllocationRecord, DemandRecord};
