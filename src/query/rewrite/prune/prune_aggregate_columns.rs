//! 聚合列裁剪规则
//!
//! 根据父节点需要的列删除无用的聚合函数，并把聚合自身需要的输入列并入上下文。
//!
//! # 转换示例
//!
//! 需求列为 `{c1}` 时：
//!
//! Before:
//! ```text
//! Aggregation(group by: v1, c1: count(*), c2: avg(v2))
//!       |
//!     Input
//! ```
//!
//! After:
//! ```text
//! Aggregation[GLOBAL](group by: v1, c1: count(*))
//!       |
//!     Input
//! ```
//!
//! # 规则要点
//!
//! - 分组键决定输出行身份，永远不裁剪
//! - HAVING 用到的列同时并入输入需求和输出需求，只被 HAVING 引用的聚合不会被删掉
//! - 结果不能是既无输入列又无聚合函数的计划：此时保留定义顺序中的第一个聚合函数，
//!   保证 COUNT 等语义下的行数正确
//! - 保留的聚合输出列与原来完全相同时不产生新节点

use crate::core::{CallOperator, ColumnRef, ColumnRefSet, OptimizerError, OptimizerResult};
use crate::query::plan::{AggType, LogicalOperator, OperatorKind, OptExpression};
use crate::query::rewrite::context::OptimizationContext;
use crate::query::rewrite::pattern::Pattern;
use crate::query::rewrite::rule::{RuleType, TransformationRule};

/// 聚合列裁剪规则
#[derive(Debug)]
pub struct PruneAggregateColumnsRule {
    pattern: Pattern,
}

impl PruneAggregateColumnsRule {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::create(OperatorKind::Aggregation).add_child(Pattern::leaf()),
        }
    }

    /// 保留一个聚合函数，并记录它需要的输入列
    fn retain(
        column: ColumnRef,
        call: &CallOperator,
        required_input: &mut ColumnRefSet,
        retained: &mut ColumnRefSet,
    ) {
        // COUNT(*) 不依赖任何列
        if !call.is_count_star() {
            required_input.union(&call.used_columns());
        }
        retained.insert(column);
    }
}

impl Default for PruneAggregateColumnsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationRule for PruneAggregateColumnsRule {
    fn rule_type(&self) -> RuleType {
        RuleType::PruneAggregateColumns
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn transform(
        &self,
        input: &OptExpression,
        context: &mut OptimizationContext,
    ) -> OptimizerResult<Vec<OptExpression>> {
        let agg = match input.op() {
            LogicalOperator::Aggregation(agg) => agg,
            _ => return Ok(Vec::new()),
        };

        let first = match agg.aggregations().first() {
            Some(first) => first,
            None => {
                return Err(OptimizerError::precondition_violation(
                    self.rule_type(),
                    input.op().to_string(),
                    "聚合函数列表为空",
                ))
            }
        };

        let mut required_input = ColumnRefSet::from_columns(agg.grouping_keys());

        // 例如 SELECT 8 FROM t0 GROUP BY v1 HAVING avg(v2) < 63
        // 输出需求要提前并入 HAVING 的列，avg(v2) 才不会被裁掉
        if let Some(predicate) = agg.predicate() {
            let used = predicate.used_columns();
            required_input.union(&used);
            context.required_columns_mut().union(&used);
        }

        let mut retained = ColumnRefSet::new();
        for (column, call) in agg.aggregations() {
            if context.required_columns().contains(*column) {
                Self::retain(*column, call, &mut required_input, &mut retained);
            }
        }

        // 例如 SELECT 1 FROM (SELECT count(2) FROM t) t 或 SELECT 8 FROM t GROUP BY v1
        // 执行时至少需要一个输入列和一个聚合函数
        if required_input.is_empty() || retained.is_empty() {
            let (column, call) = first;
            Self::retain(*column, call, &mut required_input, &mut retained);
        }

        context.required_columns_mut().union(&required_input);

        if retained == agg.aggregation_keys() {
            return Ok(Vec::new());
        }

        // 按定义顺序重建，再次应用时选出的 "第一个" 聚合函数保持不变
        let new_aggregations: Vec<_> = agg
            .aggregations()
            .iter()
            .filter(|(column, _)| retained.contains(*column))
            .cloned()
            .collect();

        let new_agg = agg
            .clone()
            .with_type(AggType::Global)
            .with_aggregations(new_aggregations)?;

        Ok(vec![OptExpression::new(
            LogicalOperator::Aggregation(new_agg),
            input.inputs().to_vec(),
        )])
    }
}
