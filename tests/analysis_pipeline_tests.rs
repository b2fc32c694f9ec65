//! 错题分析管线集成测试，包括HTTP Mock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use async_trait::async_trait;
use exam_coach::{
    AiConfig, AnalysisSource, CompletionApi, CompletionClient, LlmError, QuestionContent,
    WrongQuestionAnalysisService, WrongQuestionRecord,
};
use mockito::{Matcher, Server};
use serde_json::json;

fn make_record(id: i64, subject: &str) -> WrongQuestionRecord {
    WrongQuestionRecord {
        id,
        question_id: id * 10,
        user_answer: "A".to_string(),
        correct_answer: "B".to_string(),
        question_type: Some("singleChoice".to_string()),
        subject: Some(subject.to_string()),
        difficulty: Some("medium".to_string()),
        wrong_count: 2,
        created_at: None,
        last_wrong_at: None,
        question: Some(QuestionContent {
            question: "下列哪项属于德育的基本原则？".to_string(),
            options: Some(json!({"A": "因材施教", "B": "疏导原则"})),
            explanation: Some("疏导原则是德育的基本原则之一。".to_string()),
        }),
    }
}

fn test_config(base_url: &str, timeout_ms: u64) -> AiConfig {
    AiConfig {
        base_url: base_url.to_string(),
        api_key: "test_api_key".to_string(),
        model: "test-model".to_string(),
        max_tokens: Some(2048),
        temperature: 0.7,
        timeout_ms,
    }
}

fn service_for(base_url: &str, timeout_ms: u64) -> WrongQuestionAnalysisService {
    let client = CompletionClient::new(test_config(base_url, timeout_ms));
    WrongQuestionAnalysisService::new(Arc::new(client))
}

#[tokio::test]
async fn test_model_result_passthrough() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test_api_key")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-model",
            "stream": false,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": "X"}}]}).to_string())
        .expect(1)
        .create_async()
        .await;

    let service = service_for(&server.url(), 30_000);
    let report = service
        .analyze(vec![make_record(1, "教育学")])
        .await
        .unwrap();

    assert_eq!(report.source, AnalysisSource::Model);
    // 模型原文按原样透传，不做任何转义或后处理
    assert_eq!(report.markdown_content, "X");
    assert_eq!(report.total_wrong_questions, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_500_produces_fallback_report() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let service = service_for(&server.url(), 30_000);
    let records = vec![make_record(1, "教育心理学"), make_record(2, "教育学")];
    let report = service.analyze(records).await.unwrap();

    assert_eq!(report.source, AnalysisSource::Fallback);
    assert!(!report.markdown_content.is_empty());
    // 错题数量与输入一致
    assert!(report.markdown_content.contains("本次共分析 2 道错题"));
    // 四个固定段落齐全
    for heading in ["## 整体诊断", "## 薄弱点定位", "## 学习建议", "## 学习激励"] {
        assert!(
            report.markdown_content.contains(heading),
            "兜底报告缺少段落: {}",
            heading
        );
    }
    // 第一道错题的科目进入薄弱点定位
    assert!(report.markdown_content.contains("**最薄弱科目：** 教育心理学"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_response_produces_fallback_report() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"unexpected": "shape"}).to_string())
        .create_async()
        .await;

    let service = service_for(&server.url(), 30_000);
    let report = service.analyze(vec![make_record(1, "职业道德")]).await.unwrap();

    assert_eq!(report.source, AnalysisSource::Fallback);
    assert!(report.markdown_content.contains("本次共分析 1 道错题"));
}

/// 补全接口替身：只计数，不发网络请求
struct CountingApi {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionApi for CountingApi {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("unused".to_string())
    }
}

#[tokio::test]
async fn test_empty_records_short_circuit_without_network_call() {
    let spy = Arc::new(CountingApi {
        calls: AtomicUsize::new(0),
    });
    let service = WrongQuestionAnalysisService::new(spy.clone());

    let report = service.analyze(Vec::new()).await.unwrap();

    assert_eq!(report.source, AnalysisSource::NoData);
    assert_eq!(report.total_wrong_questions, 0);
    assert!(report.markdown_content.contains("暂无错题数据"));
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_is_bounded_and_cancels() {
    // 只接受连接、永不响应的端点
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut sockets = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => sockets.push(socket),
                Err(_) => break,
            }
        }
    });

    let client = CompletionClient::new(test_config(&format!("http://{}", addr), 300));
    let started = Instant::now();
    let result = client.complete("system", "user").await;
    let elapsed = started.elapsed();

    assert_matches!(result, Err(LlmError::Timeout(300)));
    assert!(
        elapsed < Duration::from_secs(2),
        "超时应在截止时间附近返回，实际 {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_timeout_degrades_to_fallback_through_pipeline() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            sockets.push(socket);
        }
    });

    let service = service_for(&format!("http://{}", addr), 300);
    let report = service.analyze(vec![make_record(1, "教育学")]).await.unwrap();

    assert_eq!(report.source, AnalysisSource::Fallback);
    assert!(report.markdown_content.contains("## 学习激励"));
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("rate limited")
        .create_async()
        .await;

    let client = CompletionClient::new(test_config(&server.url(), 30_000));
    let result = client.complete("system", "user").await;

    assert_matches!(
        result,
        Err(LlmError::Upstream { status: 429, ref body }) if body.as_str() == "rate limited"
    );
}

#[tokio::test]
async fn test_connection_probe_reports_availability() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": "ok"}}]}).to_string())
        .create_async()
        .await;

    let client = CompletionClient::new(test_config(&server.url(), 30_000));
    assert!(client.test_connection().await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_analyses_are_independent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": "并发结果"}}]}).to_string())
        .expect(4)
        .create_async()
        .await;

    let service = Arc::new(service_for(&server.url(), 30_000));
    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            async move { service.analyze(vec![make_record(i, "教育学")]).await }
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        let report = result.unwrap();
        assert_eq!(report.source, AnalysisSource::Model);
        assert_eq!(report.markdown_content, "并发结果");
    }
}
