//! 集成测试共享工具模块
//!
//! 提供计划构造和断言辅助函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod plan_fixtures;

use sqlrewrite::core::{ColumnRef, ColumnRefSet};

pub fn col(id: u32) -> ColumnRef {
    ColumnRef::new(id)
}

pub fn set(ids: &[u32]) -> ColumnRefSet {
    ids.iter().map(|id| col(*id)).collect()
}
