// ==========================================
// 资源规划系统 - 资源规划 API
// ==========================================
// 职责: 需求/分配/人员的业务入口 + 月度聚合触发点
// 架构: API 层 → Repository 层 / Engine 层
// 约定: 每次需求或分配的成功写入后, 显式调用一次全量重算;
//       重算不是藏在保存路径里的副作用, 而是本层的明确步骤
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::db;
use crate::domain::aggregate::MonthlyAggregate;
use crate::domain::person::Person;
use crate::domain::records::{AllocationRecord, DemandRecord};
use crate::engine::aggregation::{AggregationEngine, RecomputeResult};
use crate::repository::{
    AllocationRepository, DemandRepository, MonthlyAggregateRepository, PeopleRepository,
    RepositoryError,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// MutationOutcome - 写入结果
// ==========================================
/// 一次需求/分配写入的结果: 记录ID + 随之完成的重算统计
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub id: i64,
    pub recompute: RecomputeResult,
}

// ==========================================
// PlanningApi - 资源规划 API
// ==========================================
pub struct PlanningApi {
    demand_repo: Arc<DemandRepository>,
    allocation_repo: Arc<AllocationRepository>,
    people_repo: Arc<PeopleRepository>,
    aggregate_repo: Arc<MonthlyAggregateRepository>,
    engine: AggregationEngine,
}

impl PlanningApi {
    /// 从共享连接创建API实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        let demand_repo = Arc::new(DemandRepository::from_connection(conn.clone()));
        let allocation_repo = Arc::new(AllocationRepository::from_connection(conn.clone()));
        let people_repo = Arc::new(PeopleRepository::from_connection(conn.clone()));
        let aggregate_repo = Arc::new(MonthlyAggregateRepository::from_connection(conn));

        let engine = AggregationEngine::new(
            demand_repo.clone(),
            allocation_repo.clone(),
            people_repo.clone(),
            aggregate_repo.clone(),
        );

        Self {
            demand_repo,
            allocation_repo,
            people_repo,
            aggregate_repo,
            engine,
        }
    }

    /// 打开数据库并完成初始化 (建表 + capacity_fte 迁移 + 首次重算)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(PlanningApi): 可用的API实例, 聚合表已与源数据一致
    /// - Err: 打开/建表/迁移/重算失败
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = db::open_connection(db_path).map_err(RepositoryError::from)?;
        db::init_schema(&conn).map_err(RepositoryError::from)?;

        // 迁移前置条件: 聚合引擎假定 capacity_fte 列始终存在
        db::ensure_capacity_column(&conn).map_err(RepositoryError::from)?;

        let api = Self::from_connection(Arc::new(Mutex::new(conn)));

        // 初始化触发点: 启动时做一次全量重算
        api.recompute()?;

        Ok(api)
    }

    // ==========================================
    // 聚合操作
    // ==========================================

    /// 显式触发全量重算 (RecomputeMonthlyAggregates)
    pub fn recompute(&self) -> ApiResult<RecomputeResult> {
        Ok(self.engine.recompute()?)
    }

    /// 查询报表区间内的月度聚合序列 (两端取月, 闭区间)
    pub fn monthly_series(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<MonthlyAggregate>> {
        Ok(self.aggregate_repo.find_by_range(start_date, end_date)?)
    }

    // ==========================================
    // 需求操作 (写入后触发重算)
    // ==========================================

    /// 保存需求并重算月度聚合
    pub fn save_demand(&self, demand: &DemandRecord) -> ApiResult<MutationOutcome> {
        Self::validate_interval("需求", demand.start_date, demand.end_date)?;
        Self::validate_fte("fte_required", demand.fte_required)?;

        let id = self.demand_repo.save(demand)?;
        let recompute = self.recompute()?;
        Ok(MutationOutcome { id, recompute })
    }

    /// 删除需求并重算月度聚合
    pub fn delete_demand(&self, id: i64) -> ApiResult<RecomputeResult> {
        if !self.demand_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("需求不存在: id={}", id)));
        }
        self.recompute()
    }

    /// 查询全部需求
    pub fn list_demands(&self) -> ApiResult<Vec<DemandRecord>> {
        Ok(self.demand_repo.find_all()?)
    }

    // ==========================================
    // 分配操作 (写入后触发重算)
    // ==========================================

    /// 保存分配并重算月度聚合
    pub fn save_allocation(&self, allocation: &AllocationRecord) -> ApiResult<MutationOutcome> {
        Self::validate_interval("分配", allocation.start_date, allocation.end_date)?;
        Self::validate_fte("fte_allocated", allocation.fte_allocated)?;

        let id = self.allocation_repo.save(allocation)?;
        let recompute = self.recompute()?;
        Ok(MutationOutcome { id, recompute })
    }

    /// 删除分配并重算月度聚合
    pub fn delete_allocation(&self, id: i64) -> ApiResult<RecomputeResult> {
        if !self.allocation_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("分配不存在: id={}", id)));
        }
        self.recompute()
    }

    /// 查询全部分配
    pub fn list_allocations(&self) -> ApiResult<Vec<AllocationRecord>> {
        Ok(self.allocation_repo.find_all()?)
    }

    // ==========================================
    // 人员操作
    // ==========================================
    // 注: 人员增删只影响下一次重算取到的容量快照,
    //     不作为聚合触发点 (沿用既定行为)
    // ==========================================

    /// 保存人员
    pub fn save_person(&self, person: &Person) -> ApiResult<i64> {
        if person.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("人员姓名不能为空".to_string()));
        }
        Ok(self.people_repo.save(person)?)
    }

    /// 删除人员
    pub fn delete_person(&self, id: i64) -> ApiResult<()> {
        if !self.people_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("人员不存在: id={}", id)));
        }
        Ok(())
    }

    /// 查询全部人员
    pub fn list_people(&self) -> ApiResult<Vec<Person>> {
        Ok(self.people_repo.find_all()?)
    }

    /// 当前总人数
    pub fn headcount(&self) -> ApiResult<i64> {
        Ok(self.people_repo.count_people()?)
    }

    // ==========================================
    // 输入校验
    // ==========================================

    fn validate_interval(kind: &str, start: NaiveDate, end: NaiveDate) -> ApiResult<()> {
        if end < start {
            return Err(ApiError::InvalidInput(format!(
                "{}区间非法: start_date={} > end_date={}",
                kind, start, end
            )));
        }
        Ok(())
    }

    fn validate_fte(field: &str, value: f64) -> ApiResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "{} 必须为非负实数: {}",
                field, value
            )));
        }
        Ok(())
    }
}
