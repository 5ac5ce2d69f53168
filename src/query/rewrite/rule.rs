//! 转换规则 trait 定义
//!
//! 每个规则声明唯一的规则类型和一个模式。驱动只在模式匹配时调用 `transform`，
//! 规则返回零个或一个候选表达式：空列表表示 "没有收益，保持原节点"。
//!
//! 规则不能修改输入树，只能构造新的节点；唯一允许的副作用是把需要的列
//! 并入上下文中的需求列集合，用于向上传播列需求。

use std::fmt;

use crate::core::OptimizerResult;
use crate::query::plan::OptExpression;
use crate::query::rewrite::context::OptimizationContext;
use crate::query::rewrite::pattern::Pattern;

/// 规则分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// 列裁剪
    PruneColumns,
    /// 算子合并
    MergeOperators,
}

/// 规则类型，用于诊断输出和配置中的规则开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    PruneAggregateColumns,
    PruneProjectColumns,
    PruneScanColumns,
    MergeTwoFilters,
}

impl RuleType {
    pub const ALL: [RuleType; 4] = [
        RuleType::PruneAggregateColumns,
        RuleType::PruneProjectColumns,
        RuleType::PruneScanColumns,
        RuleType::MergeTwoFilters,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleType::PruneAggregateColumns => "PruneAggregateColumnsRule",
            RuleType::PruneProjectColumns => "PruneProjectColumnsRule",
            RuleType::PruneScanColumns => "PruneScanColumnsRule",
            RuleType::MergeTwoFilters => "MergeTwoFiltersRule",
        }
    }

    pub fn category(&self) -> RuleCategory {
        match self {
            RuleType::MergeTwoFilters => RuleCategory::MergeOperators,
            _ => RuleCategory::PruneColumns,
        }
    }

    /// 从规则名称解析
    pub fn from_name(name: &str) -> Option<RuleType> {
        Self::ALL.iter().copied().find(|rule| rule.name() == name)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 转换规则 trait
///
/// 规则对象无状态、可重入，可以在并发编译的多个查询之间只读共享。
pub trait TransformationRule: fmt::Debug + Send + Sync {
    fn rule_type(&self) -> RuleType;

    fn pattern(&self) -> &Pattern;

    /// 应用规则
    ///
    /// # 返回
    /// - `Ok(vec![])`: 没有收益的重写，保持原节点
    /// - `Ok(vec![expr])`: 用 `expr` 替换原节点
    /// - `Err(e)`: 前置条件违反，终止当前语句的编译
    fn transform(
        &self,
        input: &OptExpression,
        context: &mut OptimizationContext,
    ) -> OptimizerResult<Vec<OptExpression>>;

    fn name(&self) -> &'static str {
        self.rule_type().name()
    }

    fn category(&self) -> RuleCategory {
        self.rule_type().category()
    }

    /// 检查规则是否适用于节点
    fn check(&self, input: &OptExpression) -> bool {
        self.pattern().matches(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_round_trip() {
        for rule in RuleType::ALL {
            assert!(rule.name().ends_with("Rule"));
            assert_eq!(RuleType::from_name(rule.name()), Some(rule));
        }
        assert_eq!(RuleType::from_name("NoSuchRule"), None);
    }

    #[test]
    fn test_rule_category() {
        assert_eq!(RuleType::PruneAggregateColumns.category(), RuleCategory::PruneColumns);
        assert_eq!(RuleType::MergeTwoFilters.category(), RuleCategory::MergeOperators);
    }
}
