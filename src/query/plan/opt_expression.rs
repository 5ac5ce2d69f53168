//! 算子树节点
//!
//! OptExpression 把一个逻辑算子和它的有序子节点绑定在一起。
//! 子节点通过 Arc 共享，重写时只重建发生变化的路径，未变化的子树保持同一引用，
//! 重写前的树在其他持有者手里仍然完整可用。

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::core::{ColumnRefSet, OptimizerResult};
use crate::query::plan::operators::{LogicalOperator, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptExpression {
    op: LogicalOperator,
    inputs: Vec<Arc<OptExpression>>,
}

impl OptExpression {
    pub fn new(op: LogicalOperator, inputs: Vec<Arc<OptExpression>>) -> Self {
        Self { op, inputs }
    }

    /// 创建叶子节点
    pub fn leaf(op: LogicalOperator) -> Self {
        Self::new(op, Vec::new())
    }

    /// 以单个子节点创建
    pub fn with_input(op: LogicalOperator, input: OptExpression) -> Self {
        Self::new(op, vec![Arc::new(input)])
    }

    pub fn op(&self) -> &LogicalOperator {
        &self.op
    }

    pub fn kind(&self) -> OperatorKind {
        self.op.kind()
    }

    pub fn inputs(&self) -> &[Arc<OptExpression>] {
        &self.inputs
    }

    pub fn input(&self, index: usize) -> Option<&Arc<OptExpression>> {
        self.inputs.get(index)
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// 节点向父节点提供的列
    pub fn output_columns(&self) -> ColumnRefSet {
        match &self.op {
            LogicalOperator::Scan(scan) => scan.output_columns(),
            LogicalOperator::Project(project) => project.output_columns(),
            LogicalOperator::Aggregation(agg) => agg.output_columns(),
            LogicalOperator::Filter(_) | LogicalOperator::Join(_) => {
                let mut columns = ColumnRefSet::new();
                for input in &self.inputs {
                    columns.union(&input.output_columns());
                }
                columns
            }
        }
    }

    /// 子树节点总数
    pub fn count_nodes(&self) -> usize {
        1 + self.inputs.iter().map(|i| i.count_nodes()).sum::<usize>()
    }

    /// 以 JSON 形式导出，供外部诊断使用
    pub fn to_json(&self) -> OptimizerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.op, indent = depth * 2)?;
        for input in &self.inputs {
            input.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for OptExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
