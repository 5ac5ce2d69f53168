//! 优化上下文定义
//!
//! 自顶向下遍历时，父节点为每个子节点生成一个上下文，记录该节点需要输出的列。
//! 规则可以把额外需要的列并入其中，驱动随后据此推导子节点的需求列。

use crate::core::ColumnRefSet;

#[derive(Debug, Clone, Default)]
pub struct OptimizationContext {
    /// 当前节点需要输出的列
    required_columns: ColumnRefSet,
}

impl OptimizationContext {
    pub fn new(required_columns: ColumnRefSet) -> Self {
        Self { required_columns }
    }

    pub fn required_columns(&self) -> &ColumnRefSet {
        &self.required_columns
    }

    pub fn required_columns_mut(&mut self) -> &mut ColumnRefSet {
        &mut self.required_columns
    }

    pub fn into_required_columns(self) -> ColumnRefSet {
        self.required_columns
    }
}
