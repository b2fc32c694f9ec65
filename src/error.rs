//! 统一错误类型
//!
//! 错误传播策略：补全服务的所有故障（超时、上游错误、响应异常）都被
//! 编排层的兜底报告吸收，只有内部意外失败才作为 `AnalysisError`
//! 抛给外部调用方。

use serde::Serialize;
use thiserror::Error;

/// 补全服务调用错误
#[derive(Debug, Error, Serialize)]
pub enum LlmError {
    /// 请求超过配置的硬超时，进行中的请求已被取消
    #[error("AI request timed out after {0}ms")]
    Timeout(u64),

    /// 上游返回非成功状态码
    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// 成功状态但响应体形状不符合预期
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// 网络层失败（连接、TLS、读取响应）
    #[error("Network error: {0}")]
    Network(String),

    /// 配置无效
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// 分析编排错误
///
/// 空输入不是错误（返回"暂无数据"报告），补全失败也不是错误（返回
/// 兜底报告）；这里只承载无法安全兜底的内部失败。
#[derive(Debug, Error, Serialize)]
pub enum AnalysisError {
    /// 内部意外失败
    #[error("Analysis failed: {0}")]
    Internal(String),
}

// anyhow 上下文链折叠为单条内部错误信息
impl From<anyhow::Error> for AnalysisError {
    fn from(e: anyhow::Error) -> Self {
        AnalysisError::Internal(format!("{:#}", e))
    }
}

/// Result 类型别名
pub type AnalysisResult<T> = Result<T, AnalysisError>;
