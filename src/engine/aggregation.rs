// ==========================================
// 资源规划系统 - 月度聚合引擎
// ==========================================
// 职责: RecomputeMonthlyAggregates - 从当前需求/分配全量重算月度聚合表
// 输入: demands + allocations 全量行 + 当前人数
// 输出: monthly_demand_allocation 整表替换
// 红线: 全量重算, 不做增量; 校验失败时不落任何写入
// ==========================================

use crate::domain::aggregate::MonthlyAggregate;
use crate::engine::apportion::apportioned_fte;
use crate::engine::calendar::enumerate_months;
use crate::repository::{
    AllocationRepository, DemandRepository, MonthlyAggregateRepository, PeopleRepository,
    RepositoryError,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

// ==========================================
// AggregationError - 聚合引擎错误
// ==========================================
#[derive(Error, Debug)]
pub enum AggregationError {
    /// 上游数据完整性违规: 记录区间倒置 (end_date < start_date)。
    /// 引擎不自愈坏区间, 直接中止且不写入任何结果。
    #[error("区间非法: {kind} id={id:?}, start_date={start} > end_date={end}")]
    InvalidInterval {
        kind: &'static str, // "demand" / "allocation"
        id: Option<i64>,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// ==========================================
// RecomputeResult - 重算结果统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeResult {
    pub months_written: usize,     // 写入的月份行数
    pub demand_count: usize,       // 参与聚合的需求行数
    pub allocation_count: usize,   // 参与聚合的分配行数
    pub headcount: i64,            // 容量快照 (当前人数)
    pub elapsed_ms: i64,           // 耗时(毫秒)
}

// ==========================================
// AggregationEngine - 月度聚合引擎
// ==========================================
pub struct AggregationEngine {
    demand_repo: Arc<DemandRepository>,
    allocation_repo: Arc<AllocationRepository>,
    people_repo: Arc<PeopleRepository>,
    aggregate_repo: Arc<MonthlyAggregateRepository>,
}

impl AggregationEngine {
    /// 创建新的聚合引擎实例
    pub fn new(
        demand_repo: Arc<DemandRepository>,
        allocation_repo: Arc<AllocationRepository>,
        people_repo: Arc<PeopleRepository>,
        aggregate_repo: Arc<MonthlyAggregateRepository>,
    ) -> Self {
        Self {
            demand_repo,
            allocation_repo,
            people_repo,
            aggregate_repo,
        }
    }

    /// 从共享连接创建引擎 (各仓储复用同一连接)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self::new(
            Arc::new(DemandRepository::from_connection(conn.clone())),
            Arc::new(AllocationRepository::from_connection(conn.clone())),
            Arc::new(PeopleRepository::from_connection(conn.clone())),
            Arc::new(MonthlyAggregateRepository::from_connection(conn)),
        )
    }

    /// 全量重算月度聚合表
    ///
    /// 流程:
    /// 1. 读取全部需求/分配行, 先行校验所有区间
    /// 2. 两者皆空 → 清空聚合表返回 (空跨度, 非错误)
    /// 3. 取 min(start)/max(end) 枚举月份
    /// 4. 逐月按天加权分摊求和, capacity 取当前人数快照
    /// 5. 单事务整表替换
    ///
    /// 同一输入下确定且幂等; 任何失败都不会留下部分写入,
    /// 聚合表保持重算前的内容。
    ///
    /// 注: capacity_fte 对每个月取同一个"当前人数"快照, 包括历史月份。
    /// 这是沿用的既定行为, 人数随时间的变化暂不建模。
    #[instrument(skip(self))]
    pub fn recompute(&self) -> Result<RecomputeResult, AggregationError> {
        let started = Instant::now();

        // 1. 读取源数据
        let demands = self.demand_repo.find_all()?;
        let allocations = self.allocation_repo.find_all()?;

        // 2. 区间校验必须先于任何写入
        for demand in &demands {
            if !demand.has_valid_interval() {
                return Err(AggregationError::InvalidInterval {
                    kind: "demand",
                    id: demand.id,
                    start: demand.start_date,
                    end: demand.end_date,
                });
            }
        }
        for allocation in &allocations {
            if !allocation.has_valid_interval() {
                return Err(AggregationError::InvalidInterval {
                    kind: "allocation",
                    id: allocation.id,
                    start: allocation.start_date,
                    end: allocation.end_date,
                });
            }
        }

        // 3. 全局跨度; 无任何记录时只清空聚合表
        let min_date = demands
            .iter()
            .map(|d| d.start_date)
            .chain(allocations.iter().map(|a| a.start_date))
            .min();
        let max_date = demands
            .iter()
            .map(|d| d.end_date)
            .chain(allocations.iter().map(|a| a.end_date))
            .max();

        let (Some(min_date), Some(max_date)) = (min_date, max_date) else {
            self.aggregate_repo.clear()?;
            tracing::info!("无需求/分配记录, 月度聚合表已清空");
            return Ok(RecomputeResult {
                months_written: 0,
                demand_count: 0,
                allocation_count: 0,
                headcount: self.people_repo.count_people()?,
                elapsed_ms: started.elapsed().as_millis() as i64,
            });
        };

        // 4. 容量快照
        let headcount = self.people_repo.count_people()?;
        let capacity_fte = headcount as f64;

        // 5. 逐月聚合
        let months = enumerate_months(min_date, max_date);
        let mut rows = Vec::with_capacity(months.len());

        for month_start in months {
            let demand_fte: f64 = demands
                .iter()
                .map(|d| apportioned_fte(d.fte_required, d.start_date, d.end_date, month_start))
                .sum();

            let allocation_fte: f64 = allocations
                .iter()
                .map(|a| apportioned_fte(a.fte_allocated, a.start_date, a.end_date, month_start))
                .sum();

            rows.push(MonthlyAggregate {
                year_month: month_start,
                demand_fte,
                allocation_fte,
                capacity_fte,
            });
        }

        // 6. 单事务整表替换
        let months_written = self.aggregate_repo.replace_all(&rows)?;

        let elapsed_ms = started.elapsed().as_millis() as i64;
        tracing::info!(
            months_written,
            demand_count = demands.len(),
            allocation_count = allocations.len(),
            headcount,
            elapsed_ms,
            "月度聚合重算完成"
        );

        Ok(RecomputeResult {
            months_written,
            demand_count: demands.len(),
            allocation_count: allocations.len(),
            headcount,
            elapsed_ms,
        })
    }
}
