//! `GET /api/test`: which vendors are configured, and do they answer.
//!
//! Configured chat vendors get a minimal "Hello" call, Baidu a token
//! exchange. Alibaba has no side-effect-free call, so it is only reported
//! as configured. Unconfigured vendors are never contacted.

use super::AppState;
use crate::config::{AnthropicConfig, BaiduConfig, Config, GeminiConfig, QwenConfig};
use crate::ocr::BaiduOcr;
use crate::types::{ServiceStatus, Services, StatusReport};
use crate::vendor::chat::{ChatContent, ChatMessage, ChatRequest};
use crate::vendor::gemini::{generate_url, Content, GenerateRequest, Part};
use crate::vendor::resolve_env_var;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

const PROBE_TEXT: &str = "Hello";

pub(super) async fn test_services(State(state): State<AppState>) -> impl IntoResponse {
    let report = probe_services(&state.config, &state.client).await;
    ([(header::CACHE_CONTROL, "no-store")], Json(report))
}

/// Probe every vendor concurrently.
pub async fn probe_services(config: &Config, client: &reqwest::Client) -> StatusReport {
    let v = &config.vendors;
    let (gemini, doubao, openai, anthropic, qwen, deepseek, baidu) = tokio::join!(
        probe_gemini(client, &v.gemini),
        probe_chat(client, &v.doubao.api_key, &v.doubao.endpoint, &v.doubao.text_model),
        probe_chat(client, &v.openai.api_key, &v.openai.endpoint, &v.openai.text_model),
        probe_anthropic(client, &v.anthropic),
        probe_qwen(client, &v.qwen),
        probe_chat(client, &v.deepseek.api_key, &v.deepseek.endpoint, &v.deepseek.model),
        probe_baidu(client, &v.baidu),
    );
    let alibaba = match resolve_env_var(&v.alibaba.api_key) {
        Some(_) => ServiceStatus::configured(),
        None => ServiceStatus::unconfigured(),
    };

    StatusReport {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        services: Services {
            gemini,
            doubao,
            openai,
            anthropic,
            qwen,
            deepseek,
            baidu,
            alibaba,
        },
    }
}

async fn check(request: reqwest::RequestBuilder) -> ServiceStatus {
    match request.send().await {
        Ok(resp) => ServiceStatus::probed(resp.status().is_success()),
        Err(e) => ServiceStatus::failed(e.to_string()),
    }
}

async fn probe_gemini(client: &reqwest::Client, cfg: &GeminiConfig) -> ServiceStatus {
    let Some(key) = resolve_env_var(&cfg.api_key) else {
        return ServiceStatus::unconfigured();
    };
    let body = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part::Text(PROBE_TEXT.to_string())],
        }],
        generation_config: None,
    };
    check(
        client
            .post(generate_url(&cfg.endpoint, &cfg.ocr_model))
            .header("x-goog-api-key", key)
            .json(&body),
    )
    .await
}

/// OpenAI-compatible chat endpoints (Doubao, OpenAI, DeepSeek).
async fn probe_chat(
    client: &reqwest::Client,
    api_key: &str,
    endpoint: &str,
    model: &str,
) -> ServiceStatus {
    let Some(key) = resolve_env_var(api_key) else {
        return ServiceStatus::unconfigured();
    };
    let body = ChatRequest::new(
        model,
        vec![ChatMessage::user(ChatContent::Text(PROBE_TEXT.to_string()))],
    );
    check(client.post(endpoint).bearer_auth(key).json(&body)).await
}

async fn probe_anthropic(client: &reqwest::Client, cfg: &AnthropicConfig) -> ServiceStatus {
    let Some(key) = resolve_env_var(&cfg.api_key) else {
        return ServiceStatus::unconfigured();
    };
    let body = json!({
        "model": cfg.model,
        "max_tokens": 16,
        "messages": [{"role": "user", "content": PROBE_TEXT}]
    });
    check(
        client
            .post(&cfg.endpoint)
            .header("x-api-key", key)
            .header("anthropic-version", "2023-06-01")
            .json(&body),
    )
    .await
}

async fn probe_qwen(client: &reqwest::Client, cfg: &QwenConfig) -> ServiceStatus {
    let Some(key) = resolve_env_var(&cfg.api_key) else {
        return ServiceStatus::unconfigured();
    };
    let body = json!({
        "model": cfg.text_model,
        "input": {"messages": [{"role": "user", "content": PROBE_TEXT}]},
        "parameters": {"result_format": "message"}
    });
    check(client.post(&cfg.endpoint).bearer_auth(key).json(&body)).await
}

async fn probe_baidu(client: &reqwest::Client, cfg: &BaiduConfig) -> ServiceStatus {
    let (Some(key), Some(secret)) = (
        resolve_env_var(&cfg.api_key),
        resolve_env_var(&cfg.secret_key),
    ) else {
        return ServiceStatus::unconfigured();
    };
    match BaiduOcr::new(client.clone(), key, secret, cfg)
        .access_token()
        .await
    {
        Ok(_) => ServiceStatus::probed(true),
        Err(e) => ServiceStatus::failed(e.to_string()),
    }
}
