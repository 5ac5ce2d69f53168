//! 计划重写模块
//!
//! 基于规则的逻辑计划重写。规则由模式和转换函数组成，由 `PlanRewriter`
//! 自顶向下应用，直到没有规则再产生变化。
//!
//! # 模块结构
//!
//! - `context`: 优化上下文，记录节点需要输出的列
//! - `pattern`: 模式匹配定义
//! - `rule`: 转换规则 trait 定义
//! - `rule_registry`: 规则注册表
//! - `plan_rewriter`: 计划重写器实现
//! - `prune`: 列裁剪规则
//! - `merge`: 算子合并规则
//!
//! # 使用示例
//!
//! ```
//! use std::sync::Arc;
//!
//! use sqlrewrite::core::{CallOperator, ColumnRef, ColumnRefSet, ScalarExpression};
//! use sqlrewrite::query::plan::{
//!     AggType, LogicalAggregationOperator, LogicalOperator, LogicalScanOperator, OptExpression,
//! };
//! use sqlrewrite::query::rewrite::PlanRewriter;
//!
//! let v1 = ColumnRef::new(1);
//! let v2 = ColumnRef::new(2);
//! let scan = LogicalScanOperator::new("t0", vec![(v1, "v1".into()), (v2, "v2".into())])?;
//! let agg = LogicalAggregationOperator::new(
//!     AggType::Partial,
//!     vec![v1],
//!     vec![
//!         (ColumnRef::new(10), CallOperator::count_star()),
//!         (ColumnRef::new(11), CallOperator::new("avg", vec![ScalarExpression::column(v2)])),
//!     ],
//! )?;
//! let tree = OptExpression::with_input(
//!     LogicalOperator::Aggregation(agg),
//!     OptExpression::leaf(LogicalOperator::Scan(scan)),
//! );
//!
//! let required: ColumnRefSet = [ColumnRef::new(10)].into_iter().collect();
//! let rewritten = PlanRewriter::default().rewrite(Arc::new(tree), &required)?;
//! println!("{}", rewritten);
//! # Ok::<(), sqlrewrite::core::OptimizerError>(())
//! ```

pub mod context;
pub mod merge;
pub mod pattern;
pub mod plan_rewriter;
pub mod prune;
pub mod rule;
pub mod rule_registry;

pub use context::OptimizationContext;
pub use pattern::{MatchNode, Pattern};
pub use plan_rewriter::{PlanRewriter, RewriteStats};
pub use rule::{RuleCategory, RuleType, TransformationRule};
pub use rule_registry::RuleRegistry;

pub use merge::MergeTwoFiltersRule;
pub use prune::{PruneAggregateColumnsRule, PruneProjectColumnsRule, PruneScanColumnsRule};
