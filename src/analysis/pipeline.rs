/// 错题 AI 分析管线 - 核心业务逻辑
///
/// 流程：空输入短路 → 统计构建 → 提示词组装 → 单次补全调用 →
/// 成功透传模型原文 / 失败本地兜底。上游故障（超时、非 2xx、响应
/// 异常）一律折叠为兜底报告，不会作为错误抛给调用方。
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::llm_client::CompletionApi;

use super::prompts::{compose_user_prompt, AI_SYSTEM_PROMPT};
use super::stats::build_analysis_data;
use super::types::{AnalysisReport, AnalysisSource, WrongQuestionRecord};

/// 分析管线依赖
#[derive(Clone)]
pub struct AnalysisDeps {
    pub llm: Arc<dyn CompletionApi>,
}

/// 运行错题分析管线
pub async fn run_wrong_question_analysis(
    records: &[WrongQuestionRecord],
    deps: &AnalysisDeps,
) -> Result<AnalysisReport, AnalysisError> {
    // 1. 空输入直接返回"暂无数据"报告，不触发任何网络调用
    if records.is_empty() {
        log::info!("[WrongAnalysis] 暂无错题数据，跳过 AI 分析");
        return Ok(new_report(AnalysisSource::NoData, no_data_report(), 0));
    }

    log::info!("[WrongAnalysis] 开始 AI 分析，错题数量: {}", records.len());

    // 2. 统计构建
    let stats = build_analysis_data(records);

    // 3. 提示词组装
    let user_prompt = compose_user_prompt(&stats);
    log::info!("[WrongAnalysis] 用户提示词长度: {}", user_prompt.len());

    // 4. 单次补全调用；任何失败都以本地兜底报告收尾
    let started = Instant::now();
    let report = match deps.llm.complete(AI_SYSTEM_PROMPT, &user_prompt).await {
        Ok(content) => {
            log::info!(
                "[WrongAnalysis] AI 分析完成，耗时 {} 秒",
                started.elapsed().as_secs()
            );
            new_report(AnalysisSource::Model, content, records.len())
        }
        Err(e) => {
            log::warn!("[WrongAnalysis] AI 分析失败，使用兜底报告: {}", e);
            new_report(
                AnalysisSource::Fallback,
                build_fallback_report(records),
                records.len(),
            )
        }
    };

    Ok(report)
}

fn new_report(source: AnalysisSource, markdown_content: String, total: usize) -> AnalysisReport {
    AnalysisReport {
        id: Uuid::new_v4().to_string(),
        source,
        markdown_content,
        total_wrong_questions: total,
        generated_at: Utc::now(),
    }
}

/// 兜底分析报告：模型不可用时由本地数据确定性生成
///
/// 只使用错题数量与第一道错题的科目，其余为固定指导文案；结构与
/// 模型报告同为四段式 Markdown，保证展示层无需特殊分支。
fn build_fallback_report(records: &[WrongQuestionRecord]) -> String {
    let first_subject = records
        .first()
        .and_then(|record| record.subject.as_deref())
        .filter(|subject| !subject.is_empty())
        .unwrap_or("综合分析");

    let mut report = String::new();
    report.push_str("# AI私教分析报告\n\n");
    report.push_str("## 整体诊断\n\n");
    report.push_str(&format!(
        "本次共分析 {} 道错题。AI 分析服务暂时不可用，以下为基于本地数据的基础诊断，供复习参考。\n\n",
        records.len()
    ));
    report.push_str("## 薄弱点定位\n\n");
    report.push_str(&format!("**最薄弱科目：** {}\n\n", first_subject));
    report.push_str("**重点章节：** 基础概念\n\n");
    report.push_str("**具体知识点：**\n- 需要进一步分析\n\n");
    report.push_str("## 学习建议\n\n");
    report.push_str("- 重点复习薄弱知识点\n");
    report.push_str("- 多做练习题巩固\n");
    report.push_str("- 查漏补缺\n\n");
    report.push_str("## 学习激励\n\n");
    report.push_str("继续努力，相信你能够取得进步！\n");
    report
}

/// 暂无错题数据时的占位报告
fn no_data_report() -> String {
    let mut report = String::new();
    report.push_str("# AI私教分析报告\n\n");
    report.push_str("暂无错题数据，无法进行分析。\n\n");
    report.push_str("继续练习，积累错题后可获得个性化分析。\n");
    report
}
