//! AI 补全服务客户端
//!
//! 与 OpenAI 兼容的 chat/completions 端点通信：单次非流式请求、
//! 硬超时（超时即取消在途请求）、响应内容提取。
//! 不做重试，失败原样交给编排层决定兜底。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::error::LlmError;

type Result<T> = std::result::Result<T, LlmError>;

/// 连接阶段超时（秒）
const CONNECT_TIMEOUT_SECS: u64 = 30;
/// 连通性探测硬超时（秒）
const TEST_CONNECTION_TIMEOUT_SECS: u64 = 15;

/// AI 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    /// OpenAI 兼容端点基础地址（不含 /chat/completions 路径）
    pub base_url: String,
    /// Bearer 密钥
    pub api_key: String,
    /// 模型标识
    pub model: String,
    /// 最大输出 token 数；None 表示不限制（该字段不随请求发送）
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 硬超时（毫秒），默认 5 分钟以兼容思考模型
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_ms() -> u64 {
    300_000
}

impl AiConfig {
    /// 从环境变量加载配置（支持 .env 文件）
    ///
    /// 识别 AI_BASE_URL / AI_API_KEY / AI_MODEL / AI_MAX_TOKENS /
    /// AI_TEMPERATURE / AI_TIMEOUT，其中 AI_BASE_URL 必填。
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let loaded = config::Config::builder()
            .add_source(config::Environment::with_prefix("AI"))
            .build()
            .unwrap_or_else(|_| config::Config::builder().build().unwrap());

        let get = |key: &str, env_key: &str| -> Option<String> {
            loaded
                .get_string(key)
                .ok()
                .or_else(|| std::env::var(env_key).ok())
        };

        let base_url = get("base_url", "AI_BASE_URL")
            .ok_or_else(|| LlmError::InvalidConfig("AI_BASE_URL 未配置".to_string()))?;
        Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidConfig(format!("AI_BASE_URL 无效: {}", e)))?;

        Ok(Self {
            base_url,
            api_key: get("api_key", "AI_API_KEY").unwrap_or_default(),
            model: get("model", "AI_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash-preview-05-20".to_string()),
            max_tokens: get("max_tokens", "AI_MAX_TOKENS").and_then(|v| v.parse().ok()),
            temperature: get("temperature", "AI_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_temperature),
            timeout_ms: get("timeout", "AI_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout_ms),
        })
    }
}

/// 补全服务统一接口，便于编排层注入测试替身
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// 发送一次非流式补全请求，返回模型生成的原始文本
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// OpenAI 兼容补全客户端
pub struct CompletionClient {
    client: Client,
    config: AiConfig,
}

impl CompletionClient {
    pub fn new(config: AiConfig) -> Self {
        let client = Self::create_http_client(&config);
        Self { client, config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 创建 HTTP 客户端；完整配置构建失败时回退到默认客户端
    fn create_http_client(config: &AiConfig) -> Client {
        match ClientBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .use_rustls_tls()
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::warn!("[LlmClient] HTTP 客户端完整配置失败，回退默认客户端: {}", e);
                Client::new()
            }
        }
    }

    fn build_request_body(&self, system_prompt: &str, user_prompt: &str) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": self.config.temperature,
            "stream": false,
        });
        // max_tokens 未配置时整个字段省略，交给模型用满上下文
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }

    /// 连通性探测：发送一条最小补全请求，任何 2xx 视为可用
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": "你好" }],
            "max_tokens": 5,
        });

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send();

        match tokio::time::timeout(Duration::from_secs(TEST_CONNECTION_TIMEOUT_SECS), request).await
        {
            Ok(Ok(response)) => Ok(response.status().is_success()),
            Ok(Err(e)) => Err(LlmError::Network(format!("连接测试失败: {}", e))),
            Err(_) => Err(LlmError::Timeout(TEST_CONNECTION_TIMEOUT_SECS * 1000)),
        }
    }
}

#[async_trait]
impl CompletionApi for CompletionClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = self.build_request_body(system_prompt, user_prompt);
        let timeout_ms = self.config.timeout_ms;

        log::info!("[LlmClient] 发送补全请求: {} model={}", url, self.config.model);

        let request = async {
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        LlmError::Timeout(timeout_ms)
                    } else {
                        LlmError::Network(format!("补全请求失败: {}", e))
                    }
                })?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Upstream { status, body });
            }

            let payload: Value = response
                .json()
                .await
                .map_err(|e| LlmError::MalformedResponse(format!("响应不是合法 JSON: {}", e)))?;

            extract_message_content(&payload)
        };

        // 硬超时：截止即丢弃未完成的请求 future，在途连接随之拆除
        match tokio::time::timeout(Duration::from_millis(timeout_ms), request).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(timeout_ms)),
        }
    }
}

/// 提取 choices[0].message.content
fn extract_message_content(payload: &Value) -> Result<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|content| content.to_string())
        .ok_or_else(|| LlmError::MalformedResponse("缺少 choices[0].message.content".to_string()))
}
