// ==========================================
// 资源规划系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建表与 capacity_fte 迁移入口 (迁移不属于聚合引擎职责)
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "resource_flow.db";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径（用户数据目录下，不存在时退回当前目录）
pub fn default_db_path() -> String {
    let base: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("resource-flow")
        .join(DEFAULT_DB_FILE)
        .to_string_lossy()
        .to_string()
}

/// 初始化数据库表结构（幂等）
///
/// 日期一律以 TEXT 存储（格式 %Y-%m-%d），与仓储层读写约定一致。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS people (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            role TEXT,
            skills TEXT,
            team_id INTEGER,
            FOREIGN KEY (team_id) REFERENCES teams(id)
        );

        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT,
            status TEXT DEFAULT 'planning'
        );

        CREATE TABLE IF NOT EXISTS demands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL,
            role_required TEXT,
            skills_required TEXT,
            fte_required REAL NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            priority INTEGER DEFAULT 1,
            status TEXT DEFAULT 'open',
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        CREATE TABLE IF NOT EXISTS allocations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id INTEGER NOT NULL,
            project_id INTEGER NOT NULL,
            demand_id INTEGER,
            fte_allocated REAL NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            notes TEXT,
            FOREIGN KEY (person_id) REFERENCES people(id),
            FOREIGN KEY (project_id) REFERENCES projects(id),
            FOREIGN KEY (demand_id) REFERENCES demands(id)
        );

        CREATE TABLE IF NOT EXISTS monthly_demand_allocation (
            year_month TEXT NOT NULL PRIMARY KEY,
            demand_fte REAL DEFAULT 0,
            allocation_fte REAL DEFAULT 0,
            capacity_fte REAL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}

/// 检查某表是否存在指定列
pub fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        rusqlite::params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// 迁移前置条件: 保证 monthly_demand_allocation 携带 capacity_fte 列
///
/// 旧部署的聚合表没有 capacity_fte 列。聚合引擎假定该列始终存在，
/// 调用方必须在重算前执行本迁移; 引擎内部不会按列存在与否分支。
///
/// # 返回
/// - Ok(true): 执行了迁移（补列并以当前人数回填）
/// - Ok(false): 表结构已是最新
pub fn ensure_capacity_column(conn: &Connection) -> rusqlite::Result<bool> {
    if has_column(conn, "monthly_demand_allocation", "capacity_fte")? {
        return Ok(false);
    }

    tracing::info!("迁移 monthly_demand_allocation 表: 补充 capacity_fte 列");

    conn.execute(
        "ALTER TABLE monthly_demand_allocation ADD COLUMN capacity_fte REAL DEFAULT 0",
        [],
    )?;

    // 以当前人数回填既有行; 后续重算会整表重写
    let people_count: i64 = conn.query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))?;
    conn.execute(
        "UPDATE monthly_demand_allocation SET capacity_fte = ?1",
        rusqlite::params![people_count as f64],
    )?;

    tracing::info!("capacity_fte 列已补充, 回填值 = {}", people_count);
    Ok(true)
}
