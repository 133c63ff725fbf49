//! Conversion of messages and tool schemas to the Gemini wire format

use super::messages::{LlmMessage, MessageRole};
use crate::tools::ToolSchema;
use serde_json::{Map, Value, json};

/// JSON schema keywords the Gemini function-declaration schema rejects
const UNSUPPORTED_SCHEMA_KEYS: [&str; 8] = [
    "$schema",
    "$ref",
    "$defs",
    "definitions",
    "additionalProperties",
    "default",
    "exclusiveMinimum",
    "exclusiveMaximum",
];

/// Convert a conversation to Gemini `contents`.
///
/// System messages are folded into the first user turn, tool results are
/// sent as user turns, and a trailing model turn gets a continuation prompt
/// because Gemini requires the conversation to end with the user.
pub fn messages_to_google(messages: &[LlmMessage]) -> Vec<Value> {
    let mut converted = Vec::new();
    let mut system_message = String::new();

    for message in messages {
        match message.role {
            MessageRole::System => {
                if !system_message.is_empty() {
                    system_message.push_str("\n\n");
                }
                system_message.push_str(&message.content);
            }
            MessageRole::User => {
                let mut content = message.content.clone();
                if !system_message.is_empty() {
                    content = format!("{}\n\n{}", system_message, content);
                    system_message.clear();
                }
                converted.push(json!({
                    "role": "user",
                    "parts": [{"text": content}]
                }));
            }
            MessageRole::Assistant => {
                let mut parts = Vec::new();
                if !message.content.is_empty() {
                    parts.push(json!({"text": message.content}));
                }
                for tool_call in message.tool_calls.iter().flatten() {
                    parts.push(json!({
                        "functionCall": {
                            "name": tool_call.name,
                            "args": tool_call.arguments_value()
                        }
                    }));
                }
                if !parts.is_empty() {
                    converted.push(json!({
                        "role": "model",
                        "parts": parts
                    }));
                }
            }
            MessageRole::Tool => {
                let text = match &message.name {
                    Some(name) => format!("Result of tool `{}`:\n{}", name, message.content),
                    None => message.content.clone(),
                };
                converted.push(json!({
                    "role": "user",
                    "parts": [{"text": text}]
                }));
            }
        }
    }

    if converted.is_empty() && !system_message.is_empty() {
        converted.push(json!({
            "role": "user",
            "parts": [{"text": system_message}]
        }));
    }

    if converted.last().is_some_and(|last| last["role"] == "model") {
        converted.push(json!({
            "role": "user",
            "parts": [{"text": "Please continue with the task."}]
        }));
    }

    converted
}

/// Convert tool schemas to Gemini `functionDeclarations`
pub fn tools_to_google(tools: &[ToolSchema]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            let mut declaration = json!({
                "name": tool.name,
                "description": tool.description,
            });
            let parameters = sanitize_schema(&tool.parameters);
            let has_properties = parameters
                .get("properties")
                .and_then(Value::as_object)
                .is_some_and(|p| !p.is_empty());
            if has_properties {
                declaration["parameters"] = parameters;
            }
            declaration
        })
        .collect()
}

fn sanitize_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| !UNSUPPORTED_SCHEMA_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), sanitize_schema(value)))
                .collect();
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize_schema).collect()),
        other => other.clone(),
    }
}
