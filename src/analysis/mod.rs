/// 错题 AI 分析模块 - 诊断报告生成
///
/// 职责：
/// - 将错题记录汇总为统计数据与逐题详情文本
/// - 组装"靶向教学"提示词并发起单次补全调用
/// - 模型不可用时本地生成兜底报告（调用方永远拿到可读文本）
///
/// 报告正文按原样透传模型输出（Markdown），不解析其中的 JSON 结构。
pub mod pipeline;
pub mod prompts;
pub mod stats;
pub mod types;

use std::sync::Arc;

use crate::error::AnalysisError;
use crate::llm_client::CompletionApi;

use pipeline::{run_wrong_question_analysis, AnalysisDeps};
use types::{AnalysisReport, WrongQuestionRecord};

/// 错题分析服务
pub struct WrongQuestionAnalysisService {
    deps: AnalysisDeps,
}

impl WrongQuestionAnalysisService {
    pub fn new(llm: Arc<dyn CompletionApi>) -> Self {
        Self {
            deps: AnalysisDeps { llm },
        }
    }

    /// 分析错题并生成报告
    ///
    /// 管线在独立任务中运行：统计构建等内部缺陷导致的 panic 不会
    /// 穿透到调用方，而是折叠为 `AnalysisError::Internal`。
    pub async fn analyze(
        &self,
        records: Vec<WrongQuestionRecord>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let deps = self.deps.clone();
        let handle =
            tokio::spawn(async move { run_wrong_question_analysis(&records, &deps).await });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                log::error!("[WrongAnalysis] 分析任务异常终止: {}", e);
                Err(AnalysisError::Internal(format!("分析任务异常终止: {}", e)))
            }
        }
    }
}
