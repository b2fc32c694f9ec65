//! 学科 / 难度 / 题型静态映射表
//!
//! 与题库数据中的编码一一对应，供提示词组装查询人类可读名称、
//! 学科描述与主要知识点清单。查不到的编码由调用方决定替代文案。

/// 科目信息
#[derive(Debug, Clone, Copy)]
pub struct SubjectInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub key_topics: &'static [&'static str],
}

/// 难度信息
#[derive(Debug, Clone, Copy)]
pub struct DifficultyInfo {
    pub name: &'static str,
    pub weight: u32,
}

/// 题型信息
#[derive(Debug, Clone, Copy)]
pub struct QuestionTypeInfo {
    pub name: &'static str,
    pub description: &'static str,
}

static PEDAGOGY: SubjectInfo = SubjectInfo {
    name: "教育学",
    description: "教育基本理论、教育目的、教育过程、教学原理等",
    key_topics: &[
        "教育与教育学",
        "教育功能",
        "教育目的与制度",
        "教师与学生",
        "课程理论（新课改）",
        "教学原理（原则、方法、规律）",
        "德育原理",
        "班级管理与班主任工作",
    ],
};

static EDUCATIONAL_PSYCHOLOGY: SubjectInfo = SubjectInfo {
    name: "教育心理学",
    description: "学习心理、教学心理、学生心理发展等，涵盖普通心理学在教育中的应用",
    key_topics: &[
        "教育心理学概述",
        "认知发展（皮亚杰/维果茨基）",
        "人格与社会性发展",
        "学习理论（行为/认知/建构/人本）",
        "学习动机",
        "学习迁移与策略",
        "知识的学习（陈述性/程序性）",
        "问题解决与创造性",
        "品德发展与心理健康",
        "教师心理",
    ],
};

static PROFESSIONAL_ETHICS: SubjectInfo = SubjectInfo {
    name: "教师职业道德",
    description: "教师职业道德规范和职业操守",
    key_topics: &[
        "教师职业道德概述",
        "《中小学教师职业道德规范（2008年修订）》详解",
        "教师职业行为准则",
        "师德修养",
        "师德案例分析",
    ],
};

static EDUCATION_LAW: SubjectInfo = SubjectInfo {
    name: "教育法律法规",
    description: "教育相关法律法规和政策",
    key_topics: &[
        "《中华人民共和国教育法》",
        "《中华人民共和国义务教育法》",
        "《中华人民共和国教师法》",
        "《中华人民共和国未成年人保护法》",
        "《学生伤害事故处理办法》",
        "《新时代中小学教师职业行为十项准则》",
    ],
};

/// 按科目键查询科目信息
pub fn subject_info(subject: &str) -> Option<&'static SubjectInfo> {
    match subject {
        "教育学" => Some(&PEDAGOGY),
        "教育心理学" => Some(&EDUCATIONAL_PSYCHOLOGY),
        "职业道德" => Some(&PROFESSIONAL_ETHICS),
        "教育法律法规" => Some(&EDUCATION_LAW),
        _ => None,
    }
}

/// 按难度编码查询难度信息
pub fn difficulty_info(difficulty: &str) -> Option<&'static DifficultyInfo> {
    match difficulty {
        "easy" => Some(&DifficultyInfo {
            name: "简单",
            weight: 1,
        }),
        "medium" => Some(&DifficultyInfo {
            name: "中等",
            weight: 2,
        }),
        "hard" => Some(&DifficultyInfo {
            name: "困难",
            weight: 3,
        }),
        _ => None,
    }
}

/// 按题型编码查询题型信息
pub fn question_type_info(question_type: &str) -> Option<&'static QuestionTypeInfo> {
    match question_type {
        "singleChoice" => Some(&QuestionTypeInfo {
            name: "单选题",
            description: "单项选择题",
        }),
        "multipleChoice" => Some(&QuestionTypeInfo {
            name: "多选题",
            description: "多项选择题",
        }),
        "trueOrFalse" => Some(&QuestionTypeInfo {
            name: "判断题",
            description: "判断正误题",
        }),
        "caseStudy" => Some(&QuestionTypeInfo {
            name: "材料分析题",
            description: "结合材料进行分析论述",
        }),
        _ => None,
    }
}
