//! 列裁剪规则
//!
//! 自顶向下传递需求列，删除父节点不需要的列和聚合函数。
//! 过滤和连接没有可删除的列，它们的谓词列由驱动并入子节点的需求列。

pub mod prune_aggregate_columns;
pub mod prune_project_columns;
pub mod prune_scan_columns;

pub use prune_aggregate_columns::PruneAggregateColumnsRule;
pub use prune_project_columns::PruneProjectColumnsRule;
pub use prune_scan_columns::PruneScanColumnsRule;
