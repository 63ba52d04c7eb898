// ==========================================
// 资源规划系统 - 人员数据仓储
// ==========================================
// 职责: people表的精简CRUD + 容量快照计数
// ==========================================

use crate::domain::person::Person;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 人员仓储
pub struct PeopleRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_person_row(row: &Row<'_>) -> SqliteResult<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        skills: row.get(3)?,
        team_id: row.get(4)?,
    })
}

impl PeopleRepository {
    /// 创建新的人员仓储实例
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

    /// 统计当前总人数 (容量快照来源)
    pub fn count_people(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 查询全部人员 (按姓名排序)
    pub fn find_all(&self) -> RepositoryResult<Vec<Person>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, role, skills, team_id FROM people ORDER BY name",
        )?;

        let people = stmt
            .query_map([], map_person_row)?
            .collect::<SqliteResult<Vec<Person>>>()?;

        Ok(people)
    }

    /// 按ID查询人员
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Person>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, role, skills, team_id FROM people WHERE id = ?1")?;

        let person = stmt.query_row(params![id], map_person_row).optional()?;

        Ok(person)
    }

    /// 保存人员 (id为None时插入, 否则更新)
    pub fn save(&self, person: &Person) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        match person.id {
            Some(id) => {
                let affected = conn.execute(
                    "UPDATE people SET name = ?1, role = ?2, skills = ?3, team_id = ?4 WHERE id = ?5",
                    params![person.name, person.role, person.skills, person.team_id, id],
                )?;

                if affected == 0 {
                    return Err(RepositoryError::NotFound {
                        entity: "Person".to_string(),
                        id: id.to_string(),
                    });
                }
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO people (name, role, skills, team_id) VALUES (?1, ?2, ?3, ?4)",
                    params![person.name, person.role, person.skills, person.team_id],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// 按ID删除人员
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM people WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
