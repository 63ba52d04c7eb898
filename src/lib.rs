// ==========================================
// 资源规划系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 人员/需求/分配管理 + 月度FTE聚合
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 月度聚合
pub mod engine;

// 数据库基础设施（连接初始化/PRAGMA/建表/迁移）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{AllocationRecord, DemandRecord, MonthlyAggregate, Person};

// 仓储
pub use repository::{
    AllocationRepository, DemandRepository, MonthlyAggregateRepository, PeopleRepository,
    RepositoryError, RepositoryResult,
};

// 引擎
pub use engine::{AggregationEngine, AggregationError, RecomputeResult};

// API
pub use api::PlanningApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "资源规划系统";
