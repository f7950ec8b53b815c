//! services/meter_service/src/adapters/formatting_llm.rs
//!
//! This module contains the adapter for the remote formatting endpoint.
//! It implements the `FormattingService` port from the `core` crate.
//!
//! The endpoint accepts an OpenAI-style chat-completion request and usually
//! answers with `{"response": "<formatted text>"}`. Any 2xx status counts as
//! delivered; when the body has another shape the raw text is passed on.

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use meter_capture_core::{
    domain::SessionData,
    ports::{FormattingService, PortError, PortResult},
};
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `FormattingService` against a chat-completion proxy.
#[derive(Clone)]
pub struct ChatFormattingAdapter {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    system_prompt: String,
    api_key: Option<String>,
}

impl ChatFormattingAdapter {
    /// Creates a new `ChatFormattingAdapter`.
    pub fn new(
        http: reqwest::Client,
        endpoint: String,
        model: String,
        system_prompt: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoint,
            model,
            system_prompt,
            api_key,
        }
    }

    /// Builds the request body: the system instruction plus the session as JSON
    /// in the user message.
    pub fn build_request(&self, data: &SessionData) -> PortResult<CreateChatCompletionRequest> {
        let payload = serde_json::to_string(data)?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(payload)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `FormattingService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FormattingService for ChatFormattingAdapter {
    async fn format_session(&self, data: &SessionData) -> PortResult<String> {
        let request = self.build_request(data)?;

        let mut call = self.http.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, "Sending session for formatting");
        let response = call
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Formatting request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| {
                PortError::Unexpected(format!("Formatting endpoint rejected the request: {}", e))
            })?;

        let body = response.text().await.map_err(|e| {
            PortError::Unexpected(format!("Formatting response could not be read: {}", e))
        })?;

        Ok(formatted_text(body))
    }
}

/// The `response` string of the reply, or the whole body when there is none.
fn formatted_text(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(serde_json::Value::Object(mut fields)) => match fields.remove("response") {
            Some(serde_json::Value::String(text)) => text,
            _ => {
                warn!("Formatting reply has no `response` text, keeping the raw body");
                body
            }
        },
        _ => {
            warn!("Formatting reply is not a JSON object, keeping the raw body");
            body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_capture_core::domain::{EnergyType, MeterReading};

    fn adapter() -> ChatFormattingAdapter {
        ChatFormattingAdapter::new(
            reqwest::Client::new(),
            "http://localhost/unused".to_string(),
            "gpt-4o".to_string(),
            "Bitte formatieren.".to_string(),
            None,
        )
    }

    #[test]
    fn request_carries_the_session_as_user_content() {
        let mut data = SessionData::default();
        data.company_info.city = "Köln".to_string();
        data.meters.push(MeterReading {
            scanned_code: Some("M123".to_string()),
            energy_type: EnergyType::Electricity,
            ..Default::default()
        });

        let request = adapter().build_request(&data).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Bitte formatieren.");
        assert_eq!(body["messages"][1]["role"], "user");

        let content = body["messages"][1]["content"].as_str().expect("string content");
        let embedded: SessionData = serde_json::from_str(content).unwrap();
        assert_eq!(embedded, data);
    }

    #[test]
    fn reply_text_falls_back_to_the_raw_body() {
        assert_eq!(formatted_text(r#"{"response":"| M123 |"}"#.to_string()), "| M123 |");
        assert_eq!(
            formatted_text(r#"{"choices":[]}"#.to_string()),
            r#"{"choices":[]}"#
        );
        assert_eq!(formatted_text(r#"{"response":42}"#.to_string()), r#"{"response":42}"#);
        assert_eq!(formatted_text("ok".to_string()), "ok");
    }
}
