/// 错题 AI 分析模块 - 类型定义
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// 输入：错题记录
// ============================================================================

/// 错题记录（由数据访问层查询后提供，一条代表一道答错过的题）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongQuestionRecord {
    /// 错题记录 ID
    pub id: i64,
    /// 关联的题目 ID
    pub question_id: i64,
    /// 用户选择的答案（选项键）
    #[serde(default)]
    pub user_answer: String,
    /// 正确答案（选项键）
    #[serde(default)]
    pub correct_answer: String,
    /// 题型编码：singleChoice / multipleChoice / trueOrFalse / caseStudy
    #[serde(default)]
    pub question_type: Option<String>,
    /// 科目：教育学 / 教育心理学 / 职业道德 / 教育法律法规
    #[serde(default)]
    pub subject: Option<String>,
    /// 难度编码：easy / medium / hard
    #[serde(default)]
    pub difficulty: Option<String>,
    /// 累计答错次数
    #[serde(default = "default_wrong_count")]
    pub wrong_count: u32,
    /// 首次答错时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// 最近一次答错时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_wrong_at: Option<DateTime<Utc>>,
    /// 内嵌题目内容；缺失的记录会被统计构建跳过
    #[serde(default)]
    pub question: Option<QuestionContent>,
}

fn default_wrong_count() -> u32 {
    1
}

/// 题目内容（题干、选项、解析）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionContent {
    /// 题干
    #[serde(default)]
    pub question: String,
    /// 选项映射（选项键 -> 选项文本）
    ///
    /// 保留原始 JSON 值：历史数据里存在非对象的脏值，渲染时退化为
    /// 占位文案；对象键保持插入顺序。
    #[serde(default)]
    pub options: Option<Value>,
    /// 官方解析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// ============================================================================
// 派生统计（单次分析请求内构建，组装完提示词即丢弃）
// ============================================================================

/// 科目维度下的单题条目
#[derive(Debug, Clone, Default)]
pub struct SubjectQuestion {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub wrong_count: u32,
}

/// 单个科目的错题统计
#[derive(Debug, Clone, Default)]
pub struct SubjectStat {
    pub subject: String,
    pub count: u32,
    pub total_wrong_count: u32,
    pub questions: Vec<SubjectQuestion>,
}

/// 错题统计总览
///
/// 各统计表按键首次出现的顺序累积，保证同样的输入组装出逐字节
/// 相同的提示词。
#[derive(Debug, Clone, Default)]
pub struct AnalysisStatistics {
    /// 输入记录总数（含因题目缺失被跳过的记录）
    pub total_wrong_questions: usize,
    /// 科目 -> 统计
    pub subject_stats: Vec<SubjectStat>,
    /// 难度 -> 题数
    pub difficulty_stats: Vec<(String, u32)>,
    /// 题型 -> 题数
    pub question_type_stats: Vec<(String, u32)>,
    /// 每道有效错题的详情文本块（输入顺序）
    pub detail_texts: Vec<String>,
}

// ============================================================================
// 输出：分析报告
// ============================================================================

/// 报告来源标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// 模型生成
    Model,
    /// 模型不可用，本地兜底生成
    Fallback,
    /// 没有错题数据
    NoData,
}

impl AnalysisSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisSource::Fallback)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalysisSource::NoData)
    }
}

/// AI 分析报告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// 报告 ID
    pub id: String,
    /// 报告来源；展示层必须按此标记分支文案，而不是猜测正文内容
    pub source: AnalysisSource,
    /// Markdown 报告正文（模型原文或兜底文本，不做任何后处理）
    pub markdown_content: String,
    /// 本次分析覆盖的错题总数
    pub total_wrong_questions: usize,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
}
