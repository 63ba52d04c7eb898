// ==========================================
// 资源规划系统 - 需求/分配领域模型
// ==========================================
// 用途: 项目资源需求与人员分配的连续区间记录
// 约束: 日期区间为闭区间 (start_date <= end_date)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DemandRecord - 资源需求
// ==========================================
// 含义: 某项目在一段日期区间内对某角色的连续FTE需求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRecord {
    // ===== 主键 =====
    pub id: Option<i64>,               // 数据库自增ID (新建时为None)

    // ===== 归属 =====
    pub project_id: i64,               // 所属项目ID
    pub role_required: Option<String>, // 需求角色
    pub skills_required: Option<String>, // 需求技能 (逗号分隔)

    // ===== 核心区间 =====
    pub fte_required: f64,             // 需求FTE (>= 0)
    pub start_date: NaiveDate,         // 起始日期 (含)
    pub end_date: NaiveDate,           // 结束日期 (含)

    // ===== 管理字段 =====
    pub priority: i32,                 // 优先级 1-5
    pub status: String,                // open / partially_filled / filled / cancelled
}

impl DemandRecord {
    /// 区间是否合法 (end_date >= start_date)
    pub fn has_valid_interval(&self) -> bool {
        self.end_date >= self.start_date
    }
}

// ==========================================
// AllocationRecord - 人员分配
// ==========================================
// 含义: 某人在一段日期区间内对某项目的连续FTE投入
// 约定: 单条fte_allocated通常 <= 1.0, 本层不强制
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    // ===== 主键 =====
    pub id: Option<i64>,               // 数据库自增ID (新建时为None)

    // ===== 归属 =====
    pub person_id: i64,                // 被分配人员ID
    pub project_id: i64,               // 目标项目ID
    pub demand_id: Option<i64>,        // 关联需求ID (可选)

    // ===== 核心区间 =====
    pub fte_allocated: f64,            // 分配FTE (>= 0)
    pub start_date: NaiveDate,         // 起始日期 (含)
    pub end_date: NaiveDate,           // 结束日期 (含)

    // ===== 备注 =====
    pub notes: Option<String>,
}

impl AllocationRecord {
    /// 区间是否合法 (end_date >= start_date)
    pub fn has_valid_interval(&self) -> bool {
        self.end_date >= self.start_date
    }
}
