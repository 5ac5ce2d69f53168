//! 计划断言辅助函数

use sqlrewrite::core::ColumnRef;
use sqlrewrite::query::plan::{LogicalAggregationOperator, OptExpression};

/// 查找子树中第一个聚合节点（前序遍历）
pub fn find_aggregation(expr: &OptExpression) -> Option<&LogicalAggregationOperator> {
    if let Some(agg) = expr.op().as_aggregation() {
        return Some(agg);
    }
    expr.inputs().iter().find_map(|input| find_aggregation(input))
}

pub fn aggregation_keys(expr: &OptExpression) -> Vec<ColumnRef> {
    find_aggregation(expr)
        .expect("计划中没有聚合节点")
        .aggregations()
        .iter()
        .map(|(c, _)| *c)
        .collect()
}

/// 收集所有扫描节点读取的列，按前序遍历顺序
pub fn scan_columns(expr: &OptExpression) -> Vec<Vec<ColumnRef>> {
    let mut result = Vec::new();
    collect_scan_columns(expr, &mut result);
    result
}

fn collect_scan_columns(expr: &OptExpression, result: &mut Vec<Vec<ColumnRef>>) {
    if let Some(scan) = expr.op().as_scan() {
        result.push(scan.columns().iter().map(|(c, _)| *c).collect());
    }
    for input in expr.inputs() {
        collect_scan_columns(input, result);
    }
}
