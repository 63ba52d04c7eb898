// ==========================================
// 资源规划系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod aggregate_repo;
pub mod allocation_repo;
pub mod demand_repo;
pub mod error;
pub mod people_repo;

// 重导出核心仓储
pub use aggregate_repo::MonthlyAggregateRepository;
pub use allocation_repo::AllocationRepository;
pub use demand_repo::DemandRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use people_repo::PeopleRepository;
