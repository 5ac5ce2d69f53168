//! 逻辑计划模块
//!
//! - `operators`: 逻辑算子及其元数据
//! - `opt_expression`: 算子树节点

pub mod operators;
pub mod opt_expression;

pub use operators::{
    AggType, JoinType, LogicalAggregationOperator, LogicalFilterOperator, LogicalJoinOperator,
    LogicalOperator, LogicalProjectOperator, LogicalScanOperator, OperatorKind,
};
pub use opt_expression::OptExpression;
