// ==========================================
// 资源规划系统 - 人员领域模型
// ==========================================
// 用途: 容量快照的计数来源 (people表)
// ==========================================

use serde::{Deserialize, Serialize};

/// 人员
/// 职责: 表示一名可被分配的资源; 总人数即当前容量FTE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<i64>,           // 数据库自增ID (新建时为None)
    pub name: String,              // 姓名
    pub role: Option<String>,      // 角色
    pub skills: Option<String>,    // 技能 (逗号分隔)
    pub team_id: Option<i64>,      // 所属团队ID
}
