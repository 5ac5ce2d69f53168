//! 投影列裁剪规则
//!
//! 删除父节点不需要的投影项。如果没有任何投影项被需要，保留第一个，
//! 投影仍然要向上输出正确的行数。

use crate::core::{ColumnRefSet, OptimizerResult};
use crate::query::plan::{LogicalOperator, LogicalProjectOperator, OperatorKind, OptExpression};
use crate::query::rewrite::context::OptimizationContext;
use crate::query::rewrite::pattern::Pattern;
use crate::query::rewrite::rule::{RuleType, TransformationRule};

/// 投影列裁剪规则
#[derive(Debug)]
pub struct PruneProjectColumnsRule {
    pattern: Pattern,
}

impl PruneProjectColumnsRule {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::create(OperatorKind::Project).add_child(Pattern::leaf()),
        }
    }
}

impl Default for PruneProjectColumnsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationRule for PruneProjectColumnsRule {
    fn rule_type(&self) -> RuleType {
        RuleType::PruneProjectColumns
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn transform(
        &self,
        input: &OptExpression,
        context: &mut OptimizationContext,
    ) -> OptimizerResult<Vec<OptExpression>> {
        let project = match input.op() {
            LogicalOperator::Project(project) => project,
            _ => return Ok(Vec::new()),
        };

        let first = match project.projections().first() {
            Some(first) => first,
            None => return Ok(Vec::new()),
        };

        let mut required_input = ColumnRefSet::new();
        let mut new_projections = Vec::new();
        for (column, expr) in project.projections() {
            if context.required_columns().contains(*column) {
                required_input.union(&expr.used_columns());
                new_projections.push((*column, expr.clone()));
            }
        }

        if new_projections.is_empty() {
            let (column, expr) = first;
            required_input.union(&expr.used_columns());
            new_projections.push((*column, expr.clone()));
        }

        context.required_columns_mut().union(&required_input);

        if new_projections.len() == project.projections().len() {
            return Ok(Vec::new());
        }

        Ok(vec![OptExpression::new(
            LogicalOperator::Project(LogicalProjectOperator::new(new_projections)?),
            input.inputs().to_vec(),
        )])
    }
}
