pub mod column_ref;
pub mod error;
pub mod expression;
pub mod value;

// 错误和结果类型
pub use error::{OptimizerError, OptimizerResult};

// 核心数据类型
pub use column_ref::{ColumnRef, ColumnRefFactory, ColumnRefSet, MAX_COLUMN_ID};
pub use expression::{CallOperator, ScalarExpression};
pub use value::Value;
