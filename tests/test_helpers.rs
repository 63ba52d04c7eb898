// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================
#![allow(dead_code)]

use chrono::NaiveDate;
use resource_flow::db;
use resource_flow::domain::records::{AllocationRecord, DemandRecord};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(db::open_connection(db_path)?)
}

/// 创建测试数据库并返回共享连接
pub fn setup_shared_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    resource_flow::logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let conn = open_test_connection(&db_path).expect("打开数据库失败");
    (temp_file, Arc::new(Mutex::new(conn)))
}

/// 日期简写
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 插入测试项目（外键前置数据）
pub fn insert_test_project(conn: &Arc<Mutex<Connection>>, id: i64, name: &str) {
    let conn_lock = conn.lock().unwrap();
    conn_lock
        .execute(
            r#"INSERT INTO projects (id, name, start_date, status)
               VALUES (?1, ?2, '2024-01-01', 'active')"#,
            rusqlite::params![id, name],
        )
        .expect("插入项目失败");
}

/// 插入测试人员
pub fn insert_test_person(conn: &Arc<Mutex<Connection>>, name: &str) -> i64 {
    let conn_lock = conn.lock().unwrap();
    conn_lock
        .execute(
            "INSERT INTO people (name, role) VALUES (?1, 'Engineer')",
            rusqlite::params![name],
        )
        .expect("插入人员失败");
    conn_lock.last_insert_rowid()
}

/// 构造测试需求（不落库）
pub fn make_demand(
    project_id: i64,
    fte: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> DemandRecord {
    DemandRecord {
        id: None,
        project_id,
        role_required: Some("Engineer".to_string()),
        skills_required: None,
        fte_required: fte,
        start_date: start,
        end_date: end,
        priority: 3,
        status: "open".to_string(),
    }
}

/// 构造测试分配（不落库）
pub fn make_allocation(
    person_id: i64,
    project_id: i64,
    fte: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> AllocationRecord {
    AllocationRecord {
        id: None,
        person_id,
        project_id,
        demand_id: None,
        fte_allocated: fte,
        start_date: start,
        end_date: end,
        notes: None,
    }
}
