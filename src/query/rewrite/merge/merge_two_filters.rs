//! 合并相邻过滤规则
//!
//! # 转换示例
//!
//! Before:
//! ```text
//! Filter(a > 1)
//!     |
//! Filter(b < 2)
//!     |
//!   Input
//! ```
//!
//! After:
//! ```text
//! Filter(and(a > 1, b < 2))
//!     |
//!   Input
//! ```

use crate::core::{OptimizerResult, ScalarExpression};
use crate::query::plan::{LogicalFilterOperator, LogicalOperator, OperatorKind, OptExpression};
use crate::query::rewrite::context::OptimizationContext;
use crate::query::rewrite::pattern::Pattern;
use crate::query::rewrite::rule::{RuleType, TransformationRule};

/// 合并相邻过滤规则
#[derive(Debug)]
pub struct MergeTwoFiltersRule {
    pattern: Pattern,
}

impl MergeTwoFiltersRule {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::create(OperatorKind::Filter)
                .add_child(Pattern::create(OperatorKind::Filter).add_child(Pattern::leaf())),
        }
    }
}

impl Default for MergeTwoFiltersRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationRule for MergeTwoFiltersRule {
    fn rule_type(&self) -> RuleType {
        RuleType::MergeTwoFilters
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn transform(
        &self,
        input: &OptExpression,
        _context: &mut OptimizationContext,
    ) -> OptimizerResult<Vec<OptExpression>> {
        let upper = match input.op() {
            LogicalOperator::Filter(filter) => filter,
            _ => return Ok(Vec::new()),
        };
        let lower_expr = match input.input(0) {
            Some(child) => child,
            None => return Ok(Vec::new()),
        };
        let lower = match lower_expr.op() {
            LogicalOperator::Filter(filter) => filter,
            _ => return Ok(Vec::new()),
        };

        let predicate =
            ScalarExpression::and(upper.predicate().clone(), lower.predicate().clone());

        Ok(vec![OptExpression::new(
            LogicalOperator::Filter(LogicalFilterOperator::new(predicate)),
            lower_expr.inputs().to_vec(),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::ColumnRef;
    use crate::query::plan::LogicalScanOperator;

    fn gt(id: u32, v: i64) -> ScalarExpression {
        ScalarExpression::call(
            "gt",
            vec![ScalarExpression::column(ColumnRef::new(id)), ScalarExpression::literal(v)],
        )
    }

    #[test]
    fn test_merge_two_filters() {
        let scan = OptExpression::leaf(LogicalOperator::Scan(
            LogicalScanOperator::new(
                "t0",
                vec![(ColumnRef::new(1), "a".into()), (ColumnRef::new(2), "b".into())],
            )
            .expect("创建扫描算子失败"),
        ));
        let lower = OptExpression::with_input(
            LogicalOperator::Filter(LogicalFilterOperator::new(gt(2, 2))),
            scan,
        );
        let upper = OptExpression::with_input(
            LogicalOperator::Filter(LogicalFilterOperator::new(gt(1, 1))),
            lower,
        );

        let rule = MergeTwoFiltersRule::new();
        assert!(rule.check(&upper));
        let mut ctx = OptimizationContext::default();
        let result = rule.transform(&upper, &mut ctx).expect("应用规则失败");

        assert_eq!(result.len(), 1);
        let merged = &result[0];
        assert_eq!(merged.kind(), OperatorKind::Filter);
        assert_eq!(merged.inputs()[0].kind(), OperatorKind::Scan);
        assert!(Arc::ptr_eq(
            &merged.inputs()[0],
            &upper.inputs()[0].inputs()[0]
        ));
        assert_eq!(
            merged.op().as_filter().expect("应为过滤节点").predicate(),
            &ScalarExpression::and(gt(1, 1), gt(2, 2))
        );
    }

    #[test]
    fn test_single_filter_does_not_match() {
        let scan = OptExpression::leaf(LogicalOperator::Scan(
            LogicalScanOperator::new("t0", vec![(ColumnRef::new(1), "a".into())])
                .expect("创建扫描算子失败"),
        ));
        let filter = OptExpression::with_input(
            LogicalOperator::Filter(LogicalFilterOperator::new(gt(1, 1))),
            scan,
        );
        assert!(!MergeTwoFiltersRule::new().check(&filter));
    }
}
