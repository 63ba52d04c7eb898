// ==========================================
// 资源规划系统 - 月度聚合数据仓储
// ==========================================
// 职责: monthly_demand_allocation 表的整表替换与区间查询
// 红线: 替换必须单事务完成, 读者不得观察到半清空状态
// 前置: capacity_fte 列必须已由迁移步骤补齐 (db::ensure_capacity_column)
// ==========================================

use crate::domain::aggregate::MonthlyAggregate;
use crate::engine::calendar::month_floor;
use crate::repository::demand_repo::{format_date, parse_date};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 月度聚合仓储
pub struct MonthlyAggregateRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_aggregate_row(row: &Row<'_>) -> SqliteResult<MonthlyAggregate> {
    Ok(MonthlyAggregate {
        year_month: parse_date(&row.get::<_, String>(0)?),
        demand_fte: row.get(1)?,
        allocation_fte: row.get(2)?,
        capacity_fte: row.get(3)?,
    })
}

impl MonthlyAggregateRepository {
    /// 创建新的月度聚合仓储实例
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        let conn = Connection::open(&db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 校验迁移前置条件: capacity_fte 列必须存在
    fn check_schema(conn: &Connection) -> RepositoryResult<()> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('monthly_demand_allocation') \
             WHERE name = 'capacity_fte'",
            [],
            |row| row.get(0),
        )?;

        if count == 0 {
            return Err(RepositoryError::SchemaMismatch {
                table: "monthly_demand_allocation".to_string(),
                column: "capacity_fte".to_string(),
            });
        }
        Ok(())
    }

    /// 整表替换月度聚合行 (单事务: 先清空后插入)
    ///
    /// # 参数
    /// - rows: 新的聚合行, year_month 不得重复
    ///
    /// # 返回
    /// - Ok(usize): 写入的行数
    /// - Err(SchemaMismatch): capacity_fte 列缺失, 未做任何写入
    /// - Err(ValidationError): 输入存在重复月份, 未做任何写入
    pub fn replace_all(&self, rows: &[MonthlyAggregate]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;

        Self::check_schema(&conn)?;

        // 输入自检: 月份键不得重复
        let mut seen: HashSet<NaiveDate> = HashSet::new();
        for row in rows {
            if !seen.insert(row.year_month) {
                return Err(RepositoryError::ValidationError(format!(
                    "月度聚合行重复: year_month={}",
                    row.year_month
                )));
            }
        }

        // 事务失败时自动回滚, 旧数据保持不变
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM monthly_demand_allocation", [])?;

        for row in rows {
            tx.execute(
                r#"
                INSERT INTO monthly_demand_allocation
                    (year_month, demand_fte, allocation_fte, capacity_fte)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    format_date(row.year_month),
                    row.demand_fte,
                    row.allocation_fte,
                    row.capacity_fte,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(rows.len())
    }

    /// 清空聚合表 (无任何需求/分配时的空区间语义)
    pub fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM monthly_demand_allocation", [])?;
        Ok(())
    }

    /// 查询全部聚合行 (按月份升序)
    pub fn find_all(&self) -> RepositoryResult<Vec<MonthlyAggregate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT year_month, demand_fte, allocation_fte, capacity_fte \
             FROM monthly_demand_allocation ORDER BY year_month",
        )?;

        let rows = stmt
            .query_map([], map_aggregate_row)?
            .collect::<SqliteResult<Vec<MonthlyAggregate>>>()?;

        Ok(rows)
    }

    /// 按日期区间查询聚合行 (两端取月, 闭区间, 按月份升序)
    pub fn find_by_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<MonthlyAggregate>> {
        let conn = self.get_conn()?;

        // 与原始区间对齐到当月1号后比较
        let start_month = format_date(month_floor(start_date));
        let end_month = format_date(month_floor(end_date));

        let mut stmt = conn.prepare(
            "SELECT year_month, demand_fte, allocation_fte, capacity_fte \
             FROM monthly_demand_allocation \
             WHERE year_month >= ?1 AND year_month <= ?2 \
             ORDER BY year_month",
        )?;

        let rows = stmt
            .query_map(params![start_month, end_month], map_aggregate_row)?
            .collect::<SqliteResult<Vec<MonthlyAggregate>>>()?;

        Ok(rows)
    }
}
