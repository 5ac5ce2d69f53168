//! 列引用与列引用集合
//!
//! ColumnRef 是查询内全局唯一的列标识，只有身份语义；
//! ColumnRefSet 基于位图存储，用于推导每个节点需要的列。
//!
//! 位图按最大 id 分配空间，id 应当小而连续。`ColumnRefFactory` 从 0 开始
//! 顺序分配，并且不会超过 `MAX_COLUMN_ID`。

use std::fmt;

use bit_set::BitSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{OptimizerError, OptimizerResult};
use crate::core::expression::ScalarExpression;

/// 分配器默认的 id 上限（不含）
pub const MAX_COLUMN_ID: u32 = 1 << 24;

/// 列引用
///
/// 直接用 `new` 构造时调用方自己保证 id 唯一；id 同时是位图下标，不要使用稀疏的大 id。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef(u32);

impl ColumnRef {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 列引用分配器
///
/// 每个查询一个实例，保证分配出的 ColumnRef 在查询内唯一
#[derive(Debug)]
pub struct ColumnRefFactory {
    next_id: u32,
    limit: u32,
}

impl ColumnRefFactory {
    pub fn new() -> Self {
        Self::with_limit(MAX_COLUMN_ID)
    }

    /// 指定 id 上限（不含）
    pub fn with_limit(limit: u32) -> Self {
        Self { next_id: 0, limit }
    }

    /// 分配新的列引用，id 用尽时返回 `InvalidPlan`
    pub fn create(&mut self) -> OptimizerResult<ColumnRef> {
        if self.next_id >= self.limit {
            return Err(OptimizerError::invalid_plan(format!(
                "列引用数量超过上限 {}",
                self.limit
            )));
        }
        let column = ColumnRef(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| OptimizerError::invalid_plan("列引用 id 溢出"))?;
        Ok(column)
    }

    /// 已分配的列数
    pub fn allocated(&self) -> usize {
        self.next_id as usize
    }
}

impl Default for ColumnRefFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// 列引用集合
///
/// 内存占用与集合中最大的 id 成正比，而不是与元素个数成正比。
#[derive(Clone, Default)]
pub struct ColumnRefSet {
    bits: BitSet,
}

impl ColumnRefSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从有序列引用序列构造（例如分组键）
    pub fn from_columns<'a>(columns: impl IntoIterator<Item = &'a ColumnRef>) -> Self {
        columns.into_iter().copied().collect()
    }

    /// 从单个标量表达式使用到的列构造
    pub fn from_expression(expr: &ScalarExpression) -> Self {
        expr.used_columns()
    }

    /// 是否包含该列
    pub fn contains(&self, column: ColumnRef) -> bool {
        self.bits.contains(column.0 as usize)
    }

    /// 插入单列，返回是否为新列
    pub fn insert(&mut self, column: ColumnRef) -> bool {
        self.bits.insert(column.0 as usize)
    }

    /// 并入另一个集合（幂等）
    pub fn union(&mut self, other: &ColumnRefSet) {
        self.bits.union_with(&other.bits);
    }

    /// 返回与另一个集合的交集，不修改自身
    pub fn intersect(&self, other: &ColumnRefSet) -> ColumnRefSet {
        let mut bits = self.bits.clone();
        bits.intersect_with(&other.bits);
        Self { bits }
    }

    /// 自身的每一列是否都在 `other` 中
    pub fn is_subset(&self, other: &ColumnRefSet) -> bool {
        self.bits.is_subset(&other.bits)
    }

    /// 是否没有任何列
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// 按 id 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = ColumnRef> + '_ {
        self.bits.iter().map(|id| ColumnRef(id as u32))
    }
}

// 位图容量可能不同，按成员比较
impl PartialEq for ColumnRefSet {
    fn eq(&self, other: &Self) -> bool {
        self.bits.is_subset(&other.bits) && other.bits.is_subset(&self.bits)
    }
}

impl Eq for ColumnRefSet {}

impl FromIterator<ColumnRef> for ColumnRefSet {
    fn from_iter<T: IntoIterator<Item = ColumnRef>>(iter: T) -> Self {
        let mut set = ColumnRefSet::new();
        for column in iter {
            set.insert(column);
        }
        set
    }
}

impl fmt::Debug for ColumnRefSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ColumnRefSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", items.join(", "))
    }
}
