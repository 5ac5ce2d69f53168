//! 重写引擎错误定义
//!
//! 错误分类：
//! - 前置条件违反：上游计划有缺陷，属于致命的内部错误，不重试
//! - 无效计划：构造算子时发现结构问题（如聚合输出列重复）
//! - 配置错误：配置文件读取或解析失败
//! - 日志错误：日志器重复初始化或启动失败
//!
//! "规则不匹配" 和 "无收益重写" 都不是错误，分别表现为跳过规则和返回空的候选列表。

use thiserror::Error;

use crate::query::rewrite::RuleType;

/// 优化器错误类型
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("规则 {rule} 前置条件违反: {reason}, 节点: {node}")]
    PreconditionViolation {
        rule: RuleType,
        node: String,
        reason: String,
    },

    #[error("无效的计划结构: {0}")]
    InvalidPlan(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("日志错误: {0}")]
    Logging(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl OptimizerError {
    pub fn precondition_violation(
        rule: RuleType,
        node: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PreconditionViolation {
            rule,
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 是否为致命的内部错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PreconditionViolation { .. } | Self::InvalidPlan(_))
    }
}

impl From<serde_json::Error> for OptimizerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for OptimizerError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(format!("配置文件解析失败: {}", e))
    }
}

impl From<toml::ser::Error> for OptimizerError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Config(format!("配置序列化失败: {}", e))
    }
}

impl From<flexi_logger::FlexiLoggerError> for OptimizerError {
    fn from(e: flexi_logger::FlexiLoggerError) -> Self {
        Self::Logging(e.to_string())
    }
}

/// 优化器结果类型
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_violation_message() {
        let err = OptimizerError::precondition_violation(
            RuleType::PruneAggregateColumns,
            "LogicalAggregation[GLOBAL]",
            "聚合函数列表为空",
        );
        let msg = err.to_string();
        assert!(msg.contains("PruneAggregateColumnsRule"));
        assert!(msg.contains("LogicalAggregation"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_config_error_not_fatal() {
        let err = OptimizerError::config("bad value");
        assert!(err.to_string().contains("bad value"));
        assert!(!err.is_fatal());
    }
}
