//! 标量表达式
//!
//! 由列引用、常量和函数调用组成的表达式树。聚合函数同样用 CallOperator 表示，
//! COUNT(*) 是其中不依赖任何列的特例。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::column_ref::{ColumnRef, ColumnRefSet};
use crate::core::value::Value;

/// 标量表达式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarExpression {
    ColumnRef(ColumnRef),
    Literal(Value),
    Call(CallOperator),
}

impl ScalarExpression {
    pub fn column(column: ColumnRef) -> Self {
        ScalarExpression::ColumnRef(column)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        ScalarExpression::Literal(value.into())
    }

    pub fn call(fn_name: &str, args: Vec<ScalarExpression>) -> Self {
        ScalarExpression::Call(CallOperator::new(fn_name, args))
    }

    /// 合取两个谓词
    pub fn and(left: ScalarExpression, right: ScalarExpression) -> Self {
        Self::call("and", vec![left, right])
    }

    /// 表达式读取的全部列
    pub fn used_columns(&self) -> ColumnRefSet {
        let mut columns = ColumnRefSet::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, out: &mut ColumnRefSet) {
        match self {
            ScalarExpression::ColumnRef(column) => {
                out.insert(*column);
            }
            ScalarExpression::Literal(_) => {}
            ScalarExpression::Call(call) => {
                for arg in &call.args {
                    arg.collect_columns(out);
                }
            }
        }
    }
}

impl fmt::Display for ScalarExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpression::ColumnRef(column) => write!(f, "{}", column),
            ScalarExpression::Literal(value) => write!(f, "{}", value),
            ScalarExpression::Call(call) => write!(f, "{}", call),
        }
    }
}

/// 函数调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOperator {
    fn_name: String,
    args: Vec<ScalarExpression>,
    distinct: bool,
}

impl CallOperator {
    pub fn new(fn_name: &str, args: Vec<ScalarExpression>) -> Self {
        Self {
            fn_name: fn_name.to_lowercase(),
            args,
            distinct: false,
        }
    }

    /// COUNT(*)
    pub fn count_star() -> Self {
        Self::new("count", Vec::new())
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn fn_name(&self) -> &str {
        &self.fn_name
    }

    pub fn args(&self) -> &[ScalarExpression] {
        &self.args
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// 是否为统计全部行的 COUNT(*)，它不依赖任何输入列
    pub fn is_count_star(&self) -> bool {
        self.fn_name == "count" && self.args.is_empty()
    }

    pub fn used_columns(&self) -> ColumnRefSet {
        let mut columns = ColumnRefSet::new();
        for arg in &self.args {
            columns.union(&arg.used_columns());
        }
        columns
    }
}

impl fmt::Display for CallOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_count_star() {
            return write!(f, "count(*)");
        }
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        if self.distinct {
            write!(f, "{}(DISTINCT {})", self.fn_name, args.join(", "))
        } else {
            write!(f, "{}({})", self.fn_name, args.join(", "))
        }
    }
}
