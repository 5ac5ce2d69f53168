//! 模式匹配定义
//!
//! 描述规则可接受的算子树形状：根节点的算子种类，以及每个声明位置上的子模式。
//! 叶子通配模式匹配任意子树，用于规则不关心内部结构的子节点。

use crate::query::plan::{OperatorKind, OptExpression};

/// 节点匹配条件
#[derive(Debug, Clone, PartialEq)]
pub enum MatchNode {
    /// 匹配单个算子种类
    Single(OperatorKind),
    /// 匹配多个算子种类中的任意一个
    Multi(Vec<OperatorKind>),
    /// 匹配任意子树
    Any,
}

impl MatchNode {
    pub fn matches(&self, kind: OperatorKind) -> bool {
        match self {
            MatchNode::Single(expected) => *expected == kind,
            MatchNode::Multi(kinds) => kinds.contains(&kind),
            MatchNode::Any => true,
        }
    }
}

/// 模式
///
/// 只检查声明过的子节点位置，未声明的子节点无条件接受。
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    node: MatchNode,
    children: Vec<Pattern>,
}

impl Pattern {
    /// 匹配指定算子种类
    pub fn create(kind: OperatorKind) -> Self {
        Self {
            node: MatchNode::Single(kind),
            children: Vec::new(),
        }
    }

    /// 匹配多个算子种类中的任意一个
    pub fn multi(kinds: Vec<OperatorKind>) -> Self {
        Self {
            node: MatchNode::Multi(kinds),
            children: Vec::new(),
        }
    }

    /// 叶子通配，匹配任意子树
    pub fn leaf() -> Self {
        Self {
            node: MatchNode::Any,
            children: Vec::new(),
        }
    }

    /// 追加一个子模式
    pub fn add_child(mut self, child: Pattern) -> Self {
        self.children.push(child);
        self
    }

    /// 追加多个子模式
    pub fn add_children(mut self, children: impl IntoIterator<Item = Pattern>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn node(&self) -> &MatchNode {
        &self.node
    }

    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node, MatchNode::Any) && self.children.is_empty()
    }

    /// 检查节点是否符合模式
    pub fn matches(&self, expr: &OptExpression) -> bool {
        if !self.node.matches(expr.kind()) {
            return false;
        }

        // 声明的子节点位置必须存在
        if self.children.len() > expr.arity() {
            return false;
        }

        self.children
            .iter()
            .zip(expr.inputs())
            .all(|(pattern, input)| pattern.matches(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallOperator, ColumnRef, ScalarExpression};
    use crate::query::plan::{
        AggType, JoinType, LogicalAggregationOperator, LogicalFilterOperator, LogicalJoinOperator,
        LogicalOperator, LogicalScanOperator,
    };

    fn scan() -> OptExpression {
        OptExpression::leaf(LogicalOperator::Scan(
            LogicalScanOperator::new("t0", vec![(ColumnRef::new(1), "v1".into())])
                .expect("创建扫描算子失败"),
        ))
    }

    fn filter(input: OptExpression) -> OptExpression {
        OptExpression::with_input(
            LogicalOperator::Filter(LogicalFilterOperator::new(ScalarExpression::literal(true))),
            input,
        )
    }

    fn aggregate(input: OptExpression) -> OptExpression {
        let agg = LogicalAggregationOperator::new(
            AggType::Global,
            vec![ColumnRef::new(1)],
            vec![(ColumnRef::new(2), CallOperator::count_star())],
        )
        .expect("创建聚合算子失败");
        OptExpression::with_input(LogicalOperator::Aggregation(agg), input)
    }

    #[test]
    fn test_root_kind() {
        let pattern = Pattern::create(OperatorKind::Aggregation);
        assert!(pattern.matches(&aggregate(scan())));
        assert!(!pattern.matches(&filter(scan())));
    }

    #[test]
    fn test_leaf_matches_any_subtree() {
        let pattern = Pattern::create(OperatorKind::Aggregation).add_child(Pattern::leaf());
        assert!(pattern.matches(&aggregate(scan())));
        assert!(pattern.matches(&aggregate(filter(filter(scan())))));
        assert!(Pattern::leaf().is_leaf());
    }

    #[test]
    fn test_nested_child_pattern() {
        let pattern = Pattern::create(OperatorKind::Filter)
            .add_child(Pattern::create(OperatorKind::Filter).add_child(Pattern::leaf()));

        assert!(pattern.matches(&filter(filter(scan()))));
        assert!(!pattern.matches(&filter(scan())));
        assert!(!pattern.matches(&filter(aggregate(scan()))));
    }

    #[test]
    fn test_declared_child_must_exist() {
        let pattern = Pattern::create(OperatorKind::Scan).add_child(Pattern::leaf());
        assert!(!pattern.matches(&scan()));
        assert!(Pattern::create(OperatorKind::Scan).matches(&scan()));
    }

    #[test]
    fn test_unspecified_children_accepted() {
        let join = OptExpression::new(
            LogicalOperator::Join(LogicalJoinOperator::new(JoinType::Cross, None)),
            vec![std::sync::Arc::new(scan()), std::sync::Arc::new(filter(scan()))],
        );
        let pattern = Pattern::create(OperatorKind::Join).add_child(Pattern::create(OperatorKind::Scan));
        assert!(pattern.matches(&join));

        let pattern = Pattern::create(OperatorKind::Join)
            .add_children([Pattern::leaf(), Pattern::create(OperatorKind::Scan)]);
        assert!(!pattern.matches(&join));
    }

    #[test]
    fn test_match_node_multi() {
        let matcher = MatchNode::Multi(vec![OperatorKind::Project, OperatorKind::Filter]);
        assert!(matcher.matches(OperatorKind::Project));
        assert!(matcher.matches(OperatorKind::Filter));
        assert!(!matcher.matches(OperatorKind::Scan));
        assert!(Pattern::multi(vec![OperatorKind::Filter]).matches(&filter(scan())));
    }
}
