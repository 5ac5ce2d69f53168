//! 扫描列裁剪规则
//!
//! 扫描只读取父节点需要的列和自身谓词用到的列。一列都不需要时保留第一列，
//! 扫描仍需产生正确的行数。

use crate::core::OptimizerResult;
use crate::query::plan::{LogicalOperator, OperatorKind, OptExpression};
use crate::query::rewrite::context::OptimizationContext;
use crate::query::rewrite::pattern::Pattern;
use crate::query::rewrite::rule::{RuleType, TransformationRule};

/// 扫描列裁剪规则
#[derive(Debug)]
pub struct PruneScanColumnsRule {
    pattern: Pattern,
}

impl PruneScanColumnsRule {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::create(OperatorKind::Scan),
        }
    }
}

impl Default for PruneScanColumnsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationRule for PruneScanColumnsRule {
    fn rule_type(&self) -> RuleType {
        RuleType::PruneScanColumns
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn transform(
        &self,
        input: &OptExpression,
        context: &mut OptimizationContext,
    ) -> OptimizerResult<Vec<OptExpression>> {
        let scan = match input.op() {
            LogicalOperator::Scan(scan) => scan,
            _ => return Ok(Vec::new()),
        };

        let first = match scan.columns().first() {
            Some(first) => first,
            None => return Ok(Vec::new()),
        };

        if let Some(predicate) = scan.predicate() {
            context.required_columns_mut().union(&predicate.used_columns());
        }

        let required = context.required_columns();
        let mut new_columns: Vec<_> = scan
            .columns()
            .iter()
            .filter(|(column, _)| required.contains(*column))
            .cloned()
            .collect();

        if new_columns.is_empty() {
            new_columns.push(first.clone());
        }

        if new_columns.len() == scan.columns().len() {
            return Ok(Vec::new());
        }

        let new_scan = scan.clone().with_columns(new_columns)?;
        Ok(vec![OptExpression::new(
            LogicalOperator::Scan(new_scan),
            input.inputs().to_vec(),
        )])
    }
}
