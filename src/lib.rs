// Exam Coach library entry
// 教师考编刷题平台的 AI 错题分析引擎：统计构建、提示词组装、
// 补全调用与兜底报告。鉴权、数据访问与页面渲染由宿主应用负责。

// 声明所有子模块，以便在 crate 内可见
pub mod analysis;
pub mod error;
pub mod llm_client;
pub mod taxonomy;

// 常用类型在 crate 根再导出，宿主应用无需逐层寻址
pub use analysis::pipeline::{run_wrong_question_analysis, AnalysisDeps};
pub use analysis::prompts::{AI_SYSTEM_PROMPT, AI_USER_PROMPT_TEMPLATE};
pub use analysis::types::{
    AnalysisReport, AnalysisSource, AnalysisStatistics, QuestionContent, SubjectQuestion,
    SubjectStat, WrongQuestionRecord,
};
pub use analysis::WrongQuestionAnalysisService;
pub use error::{AnalysisError, AnalysisResult, LlmError};
pub use llm_client::{AiConfig, CompletionApi, CompletionClient};
