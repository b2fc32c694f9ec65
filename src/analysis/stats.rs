/// 错题 AI 分析模块 - 统计构建
///
/// 把错题记录列表汇总为三张分布表（科目/难度/题型）和逐题详情
/// 文本块。题目内容缺失的记录跳过并告警，绝不让单条脏数据拖垮
/// 整次分析。
use serde_json::Value;

use crate::taxonomy;

use super::types::{AnalysisStatistics, SubjectQuestion, SubjectStat, WrongQuestionRecord};

/// 构建分析统计数据
///
/// 纯函数（除日志外无副作用），不会失败；占比分母是输入记录总数，
/// 包含被跳过的无效记录。
pub fn build_analysis_data(records: &[WrongQuestionRecord]) -> AnalysisStatistics {
    let mut stats = AnalysisStatistics {
        total_wrong_questions: records.len(),
        ..Default::default()
    };

    for (index, record) in records.iter().enumerate() {
        let Some(question) = record.question.as_ref() else {
            log::warn!("[WrongAnalysis] 错题数据不完整，跳过索引 {}", index);
            continue;
        };

        let subject = non_empty(record.subject.as_deref()).unwrap_or("未知科目");
        let difficulty = non_empty(record.difficulty.as_deref()).unwrap_or("未知难度");
        let question_type = non_empty(record.question_type.as_deref()).unwrap_or("unknown");

        let question_text = if question.question.is_empty() {
            "题目内容缺失"
        } else {
            question.question.as_str()
        };
        let user_answer = non_empty(Some(record.user_answer.as_str())).unwrap_or("未知");
        let correct_answer = non_empty(Some(record.correct_answer.as_str())).unwrap_or("未知");
        // 展示用次数至少为 1；科目累计用原始值
        let display_wrong_count = record.wrong_count.max(1);

        // 科目统计
        let pos = match stats
            .subject_stats
            .iter()
            .position(|stat| stat.subject == subject)
        {
            Some(pos) => pos,
            None => {
                stats.subject_stats.push(SubjectStat {
                    subject: subject.to_string(),
                    ..Default::default()
                });
                stats.subject_stats.len() - 1
            }
        };
        let subject_stat = &mut stats.subject_stats[pos];
        subject_stat.count += 1;
        subject_stat.total_wrong_count += record.wrong_count;
        subject_stat.questions.push(SubjectQuestion {
            question: question_text.to_string(),
            user_answer: user_answer.to_string(),
            correct_answer: correct_answer.to_string(),
            wrong_count: display_wrong_count,
        });

        // 难度统计 / 题型统计
        bump_count(&mut stats.difficulty_stats, difficulty);
        bump_count(&mut stats.question_type_stats, question_type);

        // 详情文本块
        let type_label = taxonomy::question_type_info(question_type)
            .map(|info| info.name)
            .unwrap_or(question_type);
        let difficulty_label = taxonomy::difficulty_info(difficulty)
            .map(|info| info.name)
            .unwrap_or(difficulty);
        let options_text = render_options(question.options.as_ref());
        let explanation_line = match question.explanation.as_deref() {
            Some(explanation) if !explanation.is_empty() => format!("**解析**: {}", explanation),
            _ => String::new(),
        };

        stats.detail_texts.push(format!(
            "\n### 错题 {}\n**科目**: {}\n**题型**: {}\n**难度**: {}\n**错误次数**: {}\n\n**题目**: {}\n\n**选项**:\n{}\n\n**您的答案**: {}\n**正确答案**: {}\n{}\n",
            index + 1,
            subject,
            type_label,
            difficulty_label,
            display_wrong_count,
            question_text,
            options_text,
            user_answer,
            correct_answer,
            explanation_line,
        ));
    }

    stats
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn bump_count(counts: &mut Vec<(String, u32)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

/// 渲染选项为 `键. 文本` 行，按存储顺序；缺失/为空/非对象时退化为占位文案
fn render_options(options: Option<&Value>) -> String {
    let Some(Value::Object(map)) = options else {
        return "选项信息缺失".to_string();
    };
    if map.is_empty() {
        return "选项信息缺失".to_string();
    }
    map.iter()
        .map(|(key, value)| match value {
            Value::String(text) => format!("{}. {}", key, text),
            other => format!("{}. {}", key, other),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
