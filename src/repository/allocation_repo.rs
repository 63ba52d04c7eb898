// ==========================================
// 资源规划系统 - 分配数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑, 保存/删除不触发聚合重算
// ==========================================

use crate::domain::records::AllocationRecord;
use crate::repository::demand_repo::{format_date, parse_date};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationRepository - 分配仓储
// ==========================================

/// 分配仓储
/// 职责: 管理allocations表的CRUD操作
pub struct AllocationRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_allocation_row(row: &Row<'_>) -> SqliteResult<AllocationRecord> {
    Ok(AllocationRecord {
        id: row.get(0)?,
        person_id: row.get(1)?,
        project_id: row.get(2)?,
        demand_id: row.get(3)?,
        fte_allocated: row.get(4)?,
        start_date: parse_date(&row.get::<_, String>(5)?),
        end_date: parse_date(&row.get::<_, String>(6)?),
        notes: row.get(7)?,
    })
}

const ALLOCATION_COLUMNS: &str =
    "id, person_id, project_id, demand_id, fte_allocated, start_date, end_date, notes";

impl AllocationRepository {
    /// 创建新的分配仓储实例
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

    /// 查询全部分配 (按起始日期排序)
    pub fn find_all(&self) -> RepositoryResult<Vec<AllocationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ALLOCATION_COLUMNS} FROM allocations ORDER BY start_date, id"
        ))?;

        let allocations = stmt
            .query_map([], map_allocation_row)?
            .collect::<SqliteResult<Vec<AllocationRecord>>>()?;

        Ok(allocations)
    }

    /// 按ID查询单条分配
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<AllocationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ALLOCATION_COLUMNS} FROM allocations WHERE id = ?1"
        ))?;

        let allocation = stmt.query_row(params![id], map_allocation_row).optional()?;

        Ok(allocation)
    }

    /// 按人员查询分配列表
    pub fn find_by_person(&self, person_id: i64) -> RepositoryResult<Vec<AllocationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ALLOCATION_COLUMNS} FROM allocations WHERE person_id = ?1 ORDER BY start_date, id"
        ))?;

        let allocations = stmt
            .query_map(params![person_id], map_allocation_row)?
            .collect::<SqliteResult<Vec<AllocationRecord>>>()?;

        Ok(allocations)
    }

    /// 保存分配 (id为None时插入, 否则更新)
    ///
    /// # 返回
    /// - Ok(i64): 保存后的记录ID
    /// - Err: 数据库错误
    pub fn save(&self, allocation: &AllocationRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        match allocation.id {
            Some(id) => {
                let affected = conn.execute(
                    r#"
                    UPDATE allocations SET
                        person_id = ?1, project_id = ?2, demand_id = ?3,
                        fte_allocated = ?4, start_date = ?5, end_date = ?6, notes = ?7
                    WHERE id = ?8
                    "#,
                    params![
                        allocation.person_id,
                        allocation.project_id,
                        allocation.demand_id,
                        allocation.fte_allocated,
                        format_date(allocation.start_date),
                        format_date(allocation.end_date),
                        allocation.notes,
                        id,
                    ],
                )?;

                if affected == 0 {
                    return Err(RepositoryError::NotFound {
                        entity: "AllocationRecord".to_string(),
                        id: id.to_string(),
                    });
                }
                Ok(id)
            }
            None => {
                conn.execute(
                    r#"
                    INSERT INTO allocations (
                        person_id, project_id, demand_id,
                        fte_allocated, start_date, end_date, notes
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    params![
                        allocation.person_id,
                        allocation.project_id,
                        allocation.demand_id,
                        allocation.fte_allocated,
                        format_date(allocation.start_date),
                        format_date(allocation.end_date),
                        allocation.notes,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// 按ID删除分配
    ///
    /// # 返回
    /// - Ok(true): 删除了一条记录
    /// - Ok(false): 记录不存在
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM allocations WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
