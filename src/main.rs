// ==========================================
// 资源规划系统 - 主入口
// ==========================================
// 职责: 打开数据库, 完成建表/迁移/启动重算, 输出聚合摘要
// ==========================================

use resource_flow::{db, logging, PlanningApi};
use std::sync::{Arc, Mutex};

fn main() {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", resource_flow::APP_NAME);
    tracing::info!("系统版本: {}", resource_flow::VERSION);
    tracing::info!("==================================================");

    // 数据库路径: 第一个命令行参数, 缺省为用户数据目录
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(db::default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    if let Err(e) = run(&db_path) {
        tracing::error!("启动失败: {}", e);
        std::process::exit(1);
    }
}

fn run(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 建表与迁移前置条件 (capacity_fte 列)
    let conn = db::open_connection(db_path)?;
    db::init_schema(&conn)?;
    db::ensure_capacity_column(&conn)?;

    let api = PlanningApi::from_connection(Arc::new(Mutex::new(conn)));

    // 初始化触发点: 启动时全量重算一次
    let result = api.recompute()?;
    tracing::info!(
        "月度聚合就绪: {}",
        serde_json::to_string(&result).unwrap_or_default()
    );

    Ok(())
}
