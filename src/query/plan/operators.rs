//! 逻辑算子定义
//!
//! 算子种类是一个封闭的枚举，模式匹配和重写驱动都按种类穷尽匹配。
//! 算子一经构造就不再原地修改，规则通过 `with_*` 方法构造新算子。

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::core::{CallOperator, ColumnRef, ColumnRefSet, OptimizerError, OptimizerResult, ScalarExpression};

/// 算子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    Scan,
    Filter,
    Project,
    Join,
    Aggregation,
}

impl OperatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::Scan => "LogicalScan",
            OperatorKind::Filter => "LogicalFilter",
            OperatorKind::Project => "LogicalProject",
            OperatorKind::Join => "LogicalJoin",
            OperatorKind::Aggregation => "LogicalAggregation",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 聚合阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggType {
    Partial,
    Global,
}

impl fmt::Display for AggType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggType::Partial => write!(f, "PARTIAL"),
            AggType::Global => write!(f, "GLOBAL"),
        }
    }
}

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinType::Inner => "INNER",
            JoinType::LeftOuter => "LEFT OUTER",
            JoinType::RightOuter => "RIGHT OUTER",
            JoinType::FullOuter => "FULL OUTER",
            JoinType::Cross => "CROSS",
        };
        f.write_str(name)
    }
}

/// 检查输出列是否重复
fn check_unique_outputs<'a>(
    operator: &str,
    columns: impl IntoIterator<Item = &'a ColumnRef>,
) -> OptimizerResult<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(*column) {
            return Err(OptimizerError::invalid_plan(format!(
                "{} 的输出列 {} 重复定义",
                operator, column
            )));
        }
    }
    Ok(())
}

/// 逻辑算子
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LogicalOperator {
    Scan(LogicalScanOperator),
    Filter(LogicalFilterOperator),
    Project(LogicalProjectOperator),
    Join(LogicalJoinOperator),
    Aggregation(LogicalAggregationOperator),
}

impl LogicalOperator {
    pub fn kind(&self) -> OperatorKind {
        match self {
            LogicalOperator::Scan(_) => OperatorKind::Scan,
            LogicalOperator::Filter(_) => OperatorKind::Filter,
            LogicalOperator::Project(_) => OperatorKind::Project,
            LogicalOperator::Join(_) => OperatorKind::Join,
            LogicalOperator::Aggregation(_) => OperatorKind::Aggregation,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// 算子自身从输入中读取的列
    pub fn used_columns(&self) -> ColumnRefSet {
        match self {
            LogicalOperator::Scan(scan) => scan
                .predicate()
                .map(|p| p.used_columns())
                .unwrap_or_default(),
            LogicalOperator::Filter(filter) => filter.predicate().used_columns(),
            LogicalOperator::Project(project) => {
                let mut columns = ColumnRefSet::new();
                for (_, expr) in project.projections() {
                    columns.union(&expr.used_columns());
                }
                columns
            }
            LogicalOperator::Join(join) => join
                .on_predicate()
                .map(|p| p.used_columns())
                .unwrap_or_default(),
            LogicalOperator::Aggregation(agg) => agg.used_columns(),
        }
    }

    pub fn as_scan(&self) -> Option<&LogicalScanOperator> {
        match self {
            LogicalOperator::Scan(scan) => Some(scan),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&LogicalFilterOperator> {
        match self {
            LogicalOperator::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&LogicalProjectOperator> {
        match self {
            LogicalOperator::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&LogicalJoinOperator> {
        match self {
            LogicalOperator::Join(join) => Some(join),
            _ => None,
        }
    }

    pub fn as_aggregation(&self) -> Option<&LogicalAggregationOperator> {
        match self {
            LogicalOperator::Aggregation(agg) => Some(agg),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::Scan(scan) => {
                let columns: Vec<String> = scan
                    .columns()
                    .iter()
                    .map(|(c, name)| format!("{}:{}", c, name))
                    .collect();
                write!(f, "LogicalScan[{}] columns: [{}]", scan.table(), columns.join(", "))?;
                if let Some(predicate) = scan.predicate() {
                    write!(f, " predicate: {}", predicate)?;
                }
                Ok(())
            }
            LogicalOperator::Filter(filter) => {
                write!(f, "LogicalFilter predicate: {}", filter.predicate())
            }
            LogicalOperator::Project(project) => {
                let items: Vec<String> = project
                    .projections()
                    .iter()
                    .map(|(c, e)| format!("{}: {}", c, e))
                    .collect();
                write!(f, "LogicalProject {{{}}}", items.join(", "))
            }
            LogicalOperator::Join(join) => {
                write!(f, "LogicalJoin[{}]", join.join_type())?;
                if let Some(on) = join.on_predicate() {
                    write!(f, " on: {}", on)?;
                }
                Ok(())
            }
            LogicalOperator::Aggregation(agg) => {
                let keys: Vec<String> = agg.grouping_keys().iter().map(|c| c.to_string()).collect();
                let aggs: Vec<String> = agg
                    .aggregations()
                    .iter()
                    .map(|(c, call)| format!("{}: {}", c, call))
                    .collect();
                write!(
                    f,
                    "LogicalAggregation[{}] group by: [{}] aggregations: {{{}}}",
                    agg.agg_type(),
                    keys.join(", "),
                    aggs.join(", ")
                )?;
                if let Some(having) = agg.predicate() {
                    write!(f, " having: {}", having)?;
                }
                Ok(())
            }
        }
    }
}

/// 表扫描
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalScanOperator {
    table: String,
    columns: Vec<(ColumnRef, String)>,
    predicate: Option<ScalarExpression>,
}

impl LogicalScanOperator {
    pub fn new(table: &str, columns: Vec<(ColumnRef, String)>) -> OptimizerResult<Self> {
        check_unique_outputs("LogicalScan", columns.iter().map(|(c, _)| c))?;
        Ok(Self {
            table: table.to_string(),
            columns,
            predicate: None,
        })
    }

    pub fn with_predicate(mut self, predicate: ScalarExpression) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// 替换输出列，用于列裁剪
    pub fn with_columns(mut self, columns: Vec<(ColumnRef, String)>) -> OptimizerResult<Self> {
        check_unique_outputs("LogicalScan", columns.iter().map(|(c, _)| c))?;
        self.columns = columns;
        Ok(self)
    }

    /// 表名
    pub fn table(&self) -> &str {
        &self.table
    }

    /// 读取的列，按表定义顺序
    pub fn columns(&self) -> &[(ColumnRef, String)] {
        &self.columns
    }

    /// 下推到扫描的谓词
    pub fn predicate(&self) -> Option<&ScalarExpression> {
        self.predicate.as_ref()
    }

    pub fn output_columns(&self) -> ColumnRefSet {
        self.columns.iter().map(|(c, _)| *c).collect()
    }
}

/// 过滤
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalFilterOperator {
    predicate: ScalarExpression,
}

impl LogicalFilterOperator {
    pub fn new(predicate: ScalarExpression) -> Self {
        Self { predicate }
    }

    /// 过滤条件，输出列与子节点相同
    pub fn predicate(&self) -> &ScalarExpression {
        &self.predicate
    }
}

/// 投影
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalProjectOperator {
    projections: Vec<(ColumnRef, ScalarExpression)>,
}

impl LogicalProjectOperator {
    pub fn new(projections: Vec<(ColumnRef, ScalarExpression)>) -> OptimizerResult<Self> {
        check_unique_outputs("LogicalProject", projections.iter().map(|(c, _)| c))?;
        Ok(Self { projections })
    }

    /// 输出列及计算它的表达式
    pub fn projections(&self) -> &[(ColumnRef, ScalarExpression)] {
        &self.projections
    }

    pub fn output_columns(&self) -> ColumnRefSet {
        self.projections.iter().map(|(c, _)| *c).collect()
    }
}

/// 连接
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalJoinOperator {
    join_type: JoinType,
    on_predicate: Option<ScalarExpression>,
}

impl LogicalJoinOperator {
    pub fn new(join_type: JoinType, on_predicate: Option<ScalarExpression>) -> Self {
        Self {
            join_type,
            on_predicate,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    /// 连接条件，没有时为笛卡尔积
    pub fn on_predicate(&self) -> Option<&ScalarExpression> {
        self.on_predicate.as_ref()
    }
}

/// 聚合
///
/// 分组键决定输出行的身份；聚合映射按定义顺序保存，每个输出列对应一个聚合函数；
/// 可选的 HAVING 谓词在聚合之后求值。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalAggregationOperator {
    agg_type: AggType,
    grouping_keys: Vec<ColumnRef>,
    aggregations: Vec<(ColumnRef, CallOperator)>,
    predicate: Option<ScalarExpression>,
}

impl LogicalAggregationOperator {
    pub fn new(
        agg_type: AggType,
        grouping_keys: Vec<ColumnRef>,
        aggregations: Vec<(ColumnRef, CallOperator)>,
    ) -> OptimizerResult<Self> {
        check_unique_outputs(
            "LogicalAggregation",
            grouping_keys.iter().chain(aggregations.iter().map(|(c, _)| c)),
        )?;
        Ok(Self {
            agg_type,
            grouping_keys,
            aggregations,
            predicate: None,
        })
    }

    pub fn with_predicate(mut self, predicate: ScalarExpression) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_type(mut self, agg_type: AggType) -> Self {
        self.agg_type = agg_type;
        self
    }

    /// 替换聚合映射，分组键与谓词保持不变
    pub fn with_aggregations(
        mut self,
        aggregations: Vec<(ColumnRef, CallOperator)>,
    ) -> OptimizerResult<Self> {
        check_unique_outputs(
            "LogicalAggregation",
            self.grouping_keys.iter().chain(aggregations.iter().map(|(c, _)| c)),
        )?;
        self.aggregations = aggregations;
        Ok(self)
    }

    /// 聚合阶段
    pub fn agg_type(&self) -> AggType {
        self.agg_type
    }

    /// 分组键，按定义顺序
    pub fn grouping_keys(&self) -> &[ColumnRef] {
        &self.grouping_keys
    }

    /// 输出列到聚合函数的映射，按定义顺序
    pub fn aggregations(&self) -> &[(ColumnRef, CallOperator)] {
        &self.aggregations
    }

    /// HAVING 谓词
    pub fn predicate(&self) -> Option<&ScalarExpression> {
        self.predicate.as_ref()
    }

    /// 聚合输出列（不含分组键）
    pub fn aggregation_keys(&self) -> ColumnRefSet {
        self.aggregations.iter().map(|(c, _)| *c).collect()
    }

    pub fn output_columns(&self) -> ColumnRefSet {
        let mut columns = ColumnRefSet::from_columns(&self.grouping_keys);
        columns.union(&self.aggregation_keys());
        columns
    }

    fn used_columns(&self) -> ColumnRefSet {
        let mut columns = ColumnRefSet::from_columns(&self.grouping_keys);
        for (_, call) in &self.aggregations {
            columns.union(&call.used_columns());
        }
        if let Some(predicate) = &self.predicate {
            columns.union(&predicate.used_columns());
        }
        columns
    }
}
