//! 查询优化模块
//!
//! - `plan`: 逻辑算子树
//! - `rewrite`: 基于规则的计划重写

pub mod plan;
pub mod rewrite;
