//! 计划构造模块
//!
//! t0(v1, v2, v3) 和 t1(w1, w2) 两张表，以及常用的聚合、投影、过滤和连接计划

use std::sync::Arc;

use sqlrewrite::core::{CallOperator, ScalarExpression};
use sqlrewrite::query::plan::{
    AggType, JoinType, LogicalAggregationOperator, LogicalFilterOperator, LogicalJoinOperator,
    LogicalOperator, LogicalProjectOperator, LogicalScanOperator, OptExpression,
};

use super::col;

pub const V1: u32 = 1;
pub const V2: u32 = 2;
pub const V3: u32 = 3;
pub const W1: u32 = 4;
pub const W2: u32 = 5;
/// count(*)
pub const C1: u32 = 10;
/// avg(v2)
pub const C2: u32 = 11;
/// sum(v1)
pub const C3: u32 = 12;
/// 常量投影 8
pub const P1: u32 = 20;

pub fn scan_t0() -> OptExpression {
    OptExpression::leaf(LogicalOperator::Scan(
        LogicalScanOperator::new(
            "t0",
            vec![
                (col(V1), "v1".into()),
                (col(V2), "v2".into()),
                (col(V3), "v3".into()),
            ],
        )
        .expect("创建扫描算子失败"),
    ))
}

pub fn scan_t1() -> OptExpression {
    OptExpression::leaf(LogicalOperator::Scan(
        LogicalScanOperator::new("t1", vec![(col(W1), "w1".into()), (col(W2), "w2".into())])
            .expect("创建扫描算子失败"),
    ))
}

/// avg(v2) < 63，引用聚合输出列 c2
pub fn having_avg_lt_63() -> ScalarExpression {
    ScalarExpression::call(
        "lt",
        vec![ScalarExpression::column(col(C2)), ScalarExpression::literal(63)],
    )
}

/// SELECT ... FROM t0 GROUP BY v1，定义 c1 = count(*), c2 = avg(v2)
pub fn aggregation(having: Option<ScalarExpression>) -> OptExpression {
    let mut agg = LogicalAggregationOperator::new(
        AggType::Partial,
        vec![col(V1)],
        vec![
            (col(C1), CallOperator::count_star()),
            (col(C2), CallOperator::new("avg", vec![ScalarExpression::column(col(V2))])),
        ],
    )
    .expect("创建聚合算子失败");
    if let Some(having) = having {
        agg = agg.with_predicate(having);
    }
    OptExpression::with_input(LogicalOperator::Aggregation(agg), scan_t0())
}

/// SELECT avg(v2), count(*), sum(v1) FROM t0，没有分组键
pub fn global_aggregation() -> OptExpression {
    let agg = LogicalAggregationOperator::new(
        AggType::Partial,
        vec![],
        vec![
            (col(C2), CallOperator::new("avg", vec![ScalarExpression::column(col(V2))])),
            (col(C1), CallOperator::count_star()),
            (col(C3), CallOperator::new("sum", vec![ScalarExpression::column(col(V1))])),
        ],
    )
    .expect("创建聚合算子失败");
    OptExpression::with_input(LogicalOperator::Aggregation(agg), scan_t0())
}

/// 没有任何聚合函数的畸形聚合
pub fn empty_aggregation() -> OptExpression {
    let agg = LogicalAggregationOperator::new(AggType::Global, vec![col(V1)], vec![])
        .expect("创建聚合算子失败");
    OptExpression::with_input(LogicalOperator::Aggregation(agg), scan_t0())
}

/// SELECT 8 FROM (input)
pub fn select_constant(input: OptExpression) -> OptExpression {
    let project = LogicalProjectOperator::new(vec![(col(P1), ScalarExpression::literal(8))])
        .expect("创建投影算子失败");
    OptExpression::with_input(LogicalOperator::Project(project), input)
}

pub fn gt(id: u32, value: i64) -> ScalarExpression {
    ScalarExpression::call(
        "gt",
        vec![ScalarExpression::column(col(id)), ScalarExpression::literal(value)],
    )
}

pub fn filter(predicate: ScalarExpression, input: OptExpression) -> OptExpression {
    OptExpression::with_input(
        LogicalOperator::Filter(LogicalFilterOperator::new(predicate)),
        input,
    )
}

/// t0 JOIN t1 ON v1 = w1
pub fn join_t0_t1() -> OptExpression {
    let on = ScalarExpression::call(
        "eq",
        vec![
            ScalarExpression::column(col(V1)),
            ScalarExpression::column(col(W1)),
        ],
    );
    OptExpression::new(
        LogicalOperator::Join(LogicalJoinOperator::new(JoinType::Inner, Some(on))),
        vec![Arc::new(scan_t0()), Arc::new(scan_t1())],
    )
}
