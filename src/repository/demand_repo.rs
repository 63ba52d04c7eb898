// ==========================================
// 资源规划系统 - 需求数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑, 保存/删除不触发聚合重算
// ==========================================

use crate::domain::records::DemandRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// DemandRepository - 需求仓储
// ==========================================

/// 需求仓储
/// 职责: 管理demands表的CRUD操作
pub struct DemandRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_demand_row(row: &Row<'_>) -> SqliteResult<DemandRecord> {
    Ok(DemandRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        role_required: row.get(2)?,
        skills_required: row.get(3)?,
        fte_required: row.get(4)?,
        start_date: parse_date(&row.get::<_, String>(5)?),
        end_date: parse_date(&row.get::<_, String>(6)?),
        priority: row.get(7)?,
        status: row.get(8)?,
    })
}

pub(crate) fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

const DEMAND_COLUMNS: &str = "id, project_id, role_required, skills_required, \
     fte_required, start_date, end_date, priority, status";

impl DemandRepository {
    /// 创建新的需求仓储实例
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部需求 (按起始日期排序)
    pub fn find_all(&self) -> RepositoryResult<Vec<DemandRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEMAND_COLUMNS} FROM demands ORDER BY start_date, id"
        ))?;

        let demands = stmt
            .query_map([], map_demand_row)?
            .collect::<SqliteResult<Vec<DemandRecord>>>()?;

        Ok(demands)
    }

    /// 按ID查询单条需求
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<DemandRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEMAND_COLUMNS} FROM demands WHERE id = ?1"
        ))?;

        let demand = stmt.query_row(params![id], map_demand_row).optional()?;

        Ok(demand)
    }

    /// 按项目查询需求列表
    pub fn find_by_project(&self, project_id: i64) -> RepositoryResult<Vec<DemandRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEMAND_COLUMNS} FROM demands WHERE project_id = ?1 ORDER BY start_date, id"
        ))?;

        let demands = stmt
            .query_map(params![project_id], map_demand_row)?
            .collect::<SqliteResult<Vec<DemandRecord>>>()?;

        Ok(demands)
    }

    /// 保存需求 (id为None时插入, 否则更新)
    ///
    /// # 返回
    /// - Ok(i64): 保存后的记录ID
    /// - Err: 数据库错误
    pub fn save(&self, demand: &DemandRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        match demand.id {
            Some(id) => {
                let affected = conn.execute(
                    r#"
                    UPDATE demands SET
                        project_id = ?1, role_required = ?2, skills_required = ?3,
                        fte_required = ?4, start_date = ?5, end_date = ?6,
                        priority = ?7, status = ?8
                    WHERE id = ?9
                    "#,
                    params![
                        demand.project_id,
                        demand.role_required,
                        demand.skills_required,
                        demand.fte_required,
                        format_date(demand.start_date),
                        format_date(demand.end_date),
                        demand.priority,
                        demand.status,
                        id,
                    ],
                )?;

                if affected == 0 {
                    return Err(RepositoryError::NotFound {
                        entity: "DemandRecord".to_string(),
                        id: id.to_string(),
                    });
                }
                Ok(id)
            }
            None => {
                conn.execute(
                    r#"
                    INSERT INTO demands (
                        project_id, role_required, skills_required,
                        fte_required, start_date, end_date, priority, status
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                    params![
                        demand.project_id,
                        demand.role_required,
                        demand.skills_required,
                        demand.fte_required,
                        format_date(demand.start_date),
                        format_date(demand.end_date),
                        demand.priority,
                        demand.status,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// 按ID删除需求
    ///
    /// # 返回
    /// - Ok(true): 删除了一条记录
    /// - Ok(false): 记录不存在
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM demands WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
