//! Parsing of Gemini `generateContent` responses

use super::messages::{LlmResponse, LlmUsage};
use crate::error::{ScoutError, ScoutResult};
use crate::tools::ToolCall;
use serde_json::Value;
use std::collections::HashMap;

/// Parse a Gemini response into text, tool calls and usage
pub fn parse_google(response: &Value, model: &str) -> ScoutResult<LlmResponse> {
    let candidates = response["candidates"]
        .as_array()
        .ok_or_else(|| ScoutError::llm_with_provider("No candidates in Google response", "google"))?;

    let candidate = candidates
        .first()
        .ok_or_else(|| ScoutError::llm_with_provider("Empty candidates array in Google response", "google"))?;

    let parts = match candidate["content"]["parts"].as_array() {
        Some(parts) => parts,
        None => {
            let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
            return Err(ScoutError::llm_with_provider(
                format!("No content parts in Google response (finish reason: {})", reason),
                "google",
            ));
        }
    };

    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for part in parts {
        if let Some(text) = part["text"].as_str() {
            content.push_str(text);
        } else if let Some(function_call) = part["functionCall"].as_object() {
            let name = function_call
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let arguments: HashMap<String, Value> = function_call
                .get("args")
                .and_then(Value::as_object)
                .map(|args| args.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();
            tool_calls.push(ToolCall::new(
                format!("call_{}", uuid::Uuid::new_v4()),
                name,
                arguments,
            ));
        }
    }

    let usage = response["usageMetadata"].as_object().map(|usage| {
        let count = |key: &str| {
            usage
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        let prompt_tokens = count("promptTokenCount");
        let completion_tokens = count("candidatesTokenCount");
        let total = count("totalTokenCount");
        LlmUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens: if total == 0 {
                prompt_tokens + completion_tokens
            } else {
                total
            },
        }
    });

    Ok(LlmResponse {
        content,
        tool_calls,
        usage,
        model: Some(
            response["modelVersion"]
                .as_str()
                .unwrap_or(model)
                .to_string(),
        ),
    })
}
