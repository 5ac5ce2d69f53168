//! 规则注册表
//!
//! 按注册顺序保存规则。顺序决定同一节点上规则的尝试顺序，因此必须是确定的。

use std::sync::Arc;

use crate::query::rewrite::merge::MergeTwoFiltersRule;
use crate::query::rewrite::prune::{
    PruneAggregateColumnsRule, PruneProjectColumnsRule, PruneScanColumnsRule,
};
use crate::query::rewrite::rule::{RuleCategory, RuleType, TransformationRule};

#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn TransformationRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add<R: TransformationRule + 'static>(&mut self, rule: R) {
        self.rules.push(Arc::new(rule));
    }

    /// 注册已共享的规则对象
    pub fn add_shared(&mut self, rule: Arc<dyn TransformationRule>) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TransformationRule>> {
        self.rules.iter()
    }

    /// 按分类筛选，保持注册顺序
    pub fn by_category(
        &self,
        category: RuleCategory,
    ) -> impl Iterator<Item = &Arc<dyn TransformationRule>> {
        self.rules
            .iter()
            .filter(move |rule| rule.category() == category)
    }

    pub fn get(&self, rule_type: RuleType) -> Option<&Arc<dyn TransformationRule>> {
        self.rules.iter().find(|rule| rule.rule_type() == rule_type)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.add(PruneProjectColumnsRule::new());
        registry.add(PruneAggregateColumnsRule::new());
        registry.add(PruneScanColumnsRule::new());
        registry.add(MergeTwoFiltersRule::new());
        registry
    }
}
