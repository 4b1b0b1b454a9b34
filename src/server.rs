use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::Prompt;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Anything that can turn a prompt into the model's answer.
pub trait Completion {
    fn complete(&self, prompt: &Prompt) -> Result<String, String>;
}

/// Access details for an OpenAI-compatible chat-completion API.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Server {
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Server {
    /// Sends a prompt to the chat-completion endpoint and waits for
    /// the complete answer.
    ///
    /// The request carries no `Authorization` header if no API key is
    /// set, in which case the provider is expected to reject it.
    ///
    /// # Errors
    ///
    /// This method returns an error if
    ///
    /// - the HTTP request to the server fails,
    /// - the server responds with a non-success status, or
    /// - the server's response is not valid JSON or doesn't contain a
    ///   message.
    pub fn send(
        &self,
        prompt: &Prompt,
        model: &str,
        temperature: f64,
    ) -> Result<String, String> {
        let uri = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let request = Request {
            model: model.to_string(),
            messages: prompt
                .as_messages()
                .into_iter()
                .map(|(role, content)| Message {
                    role: role.to_string(),
                    content: content.to_string(),
                })
                .collect(),
            temperature,
            stream: false,
        };

        log::debug!("POST {uri}");
        log::trace!("request body: {request:?}");

        let mut builder = ureq::post(&uri);

        if let Some(ref key) = self.api_key {
            builder =
                builder.header("Authorization", &format!("Bearer {key}"));
        }

        let response = builder
            .send_json(&request)
            .map_err(|x| format!("{uri}: {x}"))?;

        get_complete_output(response)
    }
}

/// Reads the answer text from a non-streamed chat completion.
///
/// # Errors
///
/// This function returns an error if the server's response is not valid
/// JSON or doesn't contain a message field.
fn get_complete_output(
    response: http::response::Response<ureq::Body>,
) -> Result<String, String> {
    let value: Value = response
        .into_body()
        .read_json()
        .map_err(|x| format!("{x}"))?;

    if let Some(x) = value["usage"]["total_tokens"].as_u64() {
        log::info!("total tokens: {x}");
    }

    Ok(value["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| "malformed response".to_string())?
        .to_string())
}

#[derive(Debug, Serialize)]
struct Request {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}
