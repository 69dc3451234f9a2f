use crate::provider::{GenerateError, SummaryProvider};
use sesslog_core::GeneratorConfig;
use std::time::Duration;

#[cfg(feature = "remote")]
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API tier.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
pub struct RemoteProvider {
    api_key: Option<String>,
    url: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl RemoteProvider {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            url: config.api_url.clone(),
            model: config.api_model.clone(),
            max_tokens: config.api_max_tokens,
            timeout: config.api_timeout,
        }
    }

    #[cfg_attr(not(feature = "remote"), allow(dead_code))]
    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        })
    }

    #[cfg(feature = "remote")]
    fn post(&self, api_key: &str, prompt: &str) -> Result<String, GenerateError> {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .new_agent();
        let mut response = agent
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .send(self.request_body(prompt).to_string())
            .map_err(|e| GenerateError::Request(e.to_string()))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| GenerateError::Request(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GenerateError::Request(e.to_string()))?;
        response_text(&value)
    }

    #[cfg(not(feature = "remote"))]
    fn post(&self, _api_key: &str, _prompt: &str) -> Result<String, GenerateError> {
        Err(GenerateError::Unavailable(
            "remote tier not compiled in".into(),
        ))
    }
}

impl SummaryProvider for RemoteProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerateError::Unavailable("no API key configured".into()));
        };
        self.post(api_key, prompt)
    }
}

/// Pull the first text block out of a Messages API response.
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
fn response_text(value: &serde_json::Value) -> Result<String, GenerateError> {
    let text = value
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        })
        .and_then(|b| b.get("text"))
        .and_then(|t| t.as_str())
        .ok_or(GenerateError::EmptyResponse)?;
    crate::provider::non_empty(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_unavailable() {
        let provider = RemoteProvider::from_config(&GeneratorConfig::default());
        let err = provider.generate("prompt").unwrap_err();
        assert!(matches!(err, GenerateError::Unavailable(_)));
    }

    #[test]
    fn request_body_shape() {
        let provider = RemoteProvider::from_config(&GeneratorConfig::default());
        let body = provider.request_body("hello");
        assert_eq!(body["model"], "claude-haiku-4-5-20251001");
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn response_text_takes_first_text_block() {
        let value = serde_json::json!({
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "  # Session: 2026-01-10 — fix login\n"}
            ]
        });
        assert_eq!(
            response_text(&value).unwrap(),
            "# Session: 2026-01-10 — fix login"
        );
    }

    #[test]
    fn response_without_text_is_empty() {
        let value = serde_json::json!({"content": []});
        assert!(matches!(
            response_text(&value),
            Err(GenerateError::EmptyResponse)
        ));
        let blank = serde_json::json!({"content": [{"type": "text", "text": "  "}]});
        assert!(matches!(
            response_text(&blank),
            Err(GenerateError::EmptyResponse)
        ));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn unreachable_endpoint_is_request_error() {
        let config = GeneratorConfig {
            api_key: Some("sk-test".into()),
            api_url: "http://127.0.0.1:9/v1/messages".into(),
            api_timeout: Duration::from_secs(2),
            ..GeneratorConfig::default()
        };
        let provider = RemoteProvider::from_config(&config);
        assert!(matches!(
            provider.generate("prompt"),
            Err(GenerateError::Request(_))
        ));
    }

    /// Accept one request, capture its head and body, answer with `reply`.
    #[cfg(feature = "remote")]
    fn one_shot_server(
        reply: &'static str,
    ) -> (String, std::thread::JoinHandle<(Vec<String>, String)>) {
        use std::io::{BufRead, BufReader, Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1/messages", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push(line);
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            )
            .unwrap();
            (head, String::from_utf8(body).unwrap())
        });
        (url, handle)
    }

    #[cfg(feature = "remote")]
    #[test]
    fn successful_exchange_returns_trimmed_text() {
        let (url, server) = one_shot_server(
            r#"{"content":[{"type":"text","text":"  # Session: 2026-01-10 — fix login\n"}]}"#,
        );
        let config = GeneratorConfig {
            api_key: Some("sk-test".into()),
            api_url: url,
            api_timeout: Duration::from_secs(10),
            ..GeneratorConfig::default()
        };
        let provider = RemoteProvider::from_config(&config);
        assert_eq!(
            provider.generate("hello").unwrap(),
            "# Session: 2026-01-10 — fix login"
        );

        let (head, body) = server.join().unwrap();
        assert!(head[0].starts_with("POST /v1/messages "));
        let lower: Vec<String> = head.iter().map(|h| h.to_ascii_lowercase()).collect();
        assert!(lower.iter().any(|h| h == "x-api-key: sk-test"));
        assert!(lower.iter().any(|h| h == "anthropic-version: 2023-06-01"));
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["model"], "claude-haiku-4-5-20251001");
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["messages"][0]["content"], "hello");
    }
}
