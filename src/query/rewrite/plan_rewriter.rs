//! 计划重写器实现
//!
//! 自顶向下遍历算子树。每个节点先按注册顺序尝试所有模式匹配的规则，
//! 再根据 (规则处理后的需求列 ∪ 节点自身用到的列) ∩ 子节点输出列 推导子节点的需求列。
//! 一轮遍历中有规则生效就再来一轮，直到没有变化或达到最大轮数。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::config::OptimizerConfig;
use crate::core::{ColumnRefSet, OptimizerResult};
use crate::query::plan::OptExpression;
use crate::query::rewrite::context::OptimizationContext;
use crate::query::rewrite::rule::{RuleType, TransformationRule};
use crate::query::rewrite::rule_registry::RuleRegistry;

/// 重写统计信息
#[derive(Debug, Clone, Default)]
pub struct RewriteStats {
    /// 执行的遍历轮数，包括最后一轮确认没有变化的遍历
    pub rounds: usize,
    pub rules_applied: usize,
    pub applied_by_rule: HashMap<RuleType, usize>,
    /// 是否在最大轮数内达到不动点
    pub converged: bool,
}

impl RewriteStats {
    fn record_rule_application(&mut self, rule: RuleType) {
        self.rules_applied += 1;
        *self.applied_by_rule.entry(rule).or_insert(0) += 1;
    }

    /// 某条规则生效的次数
    pub fn applied(&self, rule: RuleType) -> usize {
        self.applied_by_rule.get(&rule).copied().unwrap_or(0)
    }
}

/// 计划重写器
///
/// 重写器本身不保存任何查询状态，可以在多个线程间共享，同时编译多个查询。
#[derive(Debug)]
pub struct PlanRewriter {
    rules: Vec<Arc<dyn TransformationRule>>,
    max_iteration_rounds: usize,
}

impl PlanRewriter {
    pub fn new(registry: RuleRegistry, config: OptimizerConfig) -> OptimizerResult<Self> {
        config.validate()?;

        let mut disabled = HashSet::new();
        for name in &config.disabled_rules {
            match RuleType::from_name(name) {
                Some(rule) => {
                    disabled.insert(rule);
                }
                None => warn!("忽略未知的规则名称: {}", name),
            }
        }

        let rules: Vec<_> = registry
            .iter()
            .filter(|rule| !disabled.contains(&rule.rule_type()))
            .cloned()
            .collect();

        debug!(
            "创建计划重写器: 启用规则 {} 条, 禁用 {} 条",
            rules.len(),
            registry.len() - rules.len()
        );

        Ok(Self {
            rules,
            max_iteration_rounds: config.max_iteration_rounds,
        })
    }

    /// 使用全部默认规则创建
    pub fn with_default_rules(config: OptimizerConfig) -> OptimizerResult<Self> {
        Self::new(RuleRegistry::default(), config)
    }

    /// 启用的规则，按尝试顺序
    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn TransformationRule>> {
        self.rules.iter()
    }

    pub fn max_iteration_rounds(&self) -> usize {
        self.max_iteration_rounds
    }

    /// 重写计划树
    ///
    /// `required` 是整条语句需要输出的列。输入树不会被修改，
    /// 没有变化的子树在结果中保持同一个 `Arc`。
    pub fn rewrite(
        &self,
        tree: Arc<OptExpression>,
        required: &ColumnRefSet,
    ) -> OptimizerResult<Arc<OptExpression>> {
        self.rewrite_with_stats(tree, required).map(|(tree, _)| tree)
    }

    pub fn rewrite_with_stats(
        &self,
        tree: Arc<OptExpression>,
        required: &ColumnRefSet,
    ) -> OptimizerResult<(Arc<OptExpression>, RewriteStats)> {
        let mut stats = RewriteStats::default();
        let mut current = tree;
        let mut changed = true;

        while changed && stats.rounds < self.max_iteration_rounds {
            let applied_before = stats.rules_applied;
            current = self.rewrite_node(&current, required.clone(), &mut stats)?;
            stats.rounds += 1;
            changed = stats.rules_applied > applied_before;
        }

        stats.converged = !changed;
        if changed {
            warn!(
                "达到最大迭代轮数 {}，使用最后一轮的计划，规则生效 {} 次",
                self.max_iteration_rounds, stats.rules_applied
            );
        }

        info!(
            "计划重写完成: 轮数 {}, 规则生效 {} 次",
            stats.rounds, stats.rules_applied
        );
        Ok((current, stats))
    }

    /// 并行重写多个互不相关的查询，结果顺序与输入一致
    pub fn rewrite_batch(
        &self,
        queries: Vec<(Arc<OptExpression>, ColumnRefSet)>,
    ) -> Vec<OptimizerResult<Arc<OptExpression>>> {
        queries
            .into_par_iter()
            .map(|(tree, required)| self.rewrite(tree, &required))
            .collect()
    }

    /// 一轮遍历中处理单个节点及其子树
    fn rewrite_node(
        &self,
        node: &Arc<OptExpression>,
        required: ColumnRefSet,
        stats: &mut RewriteStats,
    ) -> OptimizerResult<Arc<OptExpression>> {
        let mut current = Arc::clone(node);
        let mut context = OptimizationContext::new(required);

        for rule in &self.rules {
            if !rule.check(&current) {
                continue;
            }
            trace!("规则 {} 匹配节点 {}", rule.name(), current.op());

            let alternatives = rule.transform(&current, &mut context)?;
            if let Some(alternative) = alternatives.into_iter().next() {
                debug!(
                    "规则 {} 重写节点: {} => {}",
                    rule.name(),
                    current.op(),
                    alternative.op()
                );
                current = Arc::new(alternative);
                stats.record_rule_application(rule.rule_type());
            }
        }

        let mut parent_required = context.into_required_columns();
        parent_required.union(&current.op().used_columns());

        let mut inputs = Vec::with_capacity(current.arity());
        let mut children_changed = false;
        for child in current.inputs() {
            let child_required = parent_required.intersect(&child.output_columns());
            let new_child = self.rewrite_node(child, child_required, stats)?;
            children_changed |= !Arc::ptr_eq(&new_child, child);
            inputs.push(new_child);
        }

        if children_changed {
            current = Arc::new(OptExpression::new(current.op().clone(), inputs));
        }
        Ok(current)
    }
}

impl Default for PlanRewriter {
    fn default() -> Self {
        Self {
            rules: RuleRegistry::default().iter().cloned().collect(),
            max_iteration_rounds: OptimizerConfig::default().max_iteration_rounds,
        }
    }
}
