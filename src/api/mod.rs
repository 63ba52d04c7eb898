// ==========================================
// 资源规划系统 - API 层
// ==========================================
// 职责: 对外业务接口, 聚合触发点所在层
// ==========================================

pub mod error;
pub mod planning_api;

// 重导出
pub use error::{ApiError, ApiResult};
pub use planning_api::{MutationOutcome, PlanningApi};
