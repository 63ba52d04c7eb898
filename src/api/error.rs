// ==========================================
// 资源规划系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 转换仓储/引擎错误为用户可读的错误
// ==========================================

use crate::engine::aggregation::AggregationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
