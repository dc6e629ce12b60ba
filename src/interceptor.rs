//! Generation interceptor: looks up lore relevant to the latest chat message
//! and prepends it to what the host is about to send.
//!
//! The host calls in one of two ways (see [`HostConvention`]); both go through
//! [`Interceptor::intercept`]. Any failure along the way (no message, no
//! active lore book, backend down, no hits) hands the input back untouched.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backend::{SearchRequest, SearchResponse, VectorBackend};
use crate::config::{HostConvention, InterceptorConfig};

/// One chat message as the host stores it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_user: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub mes: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChatMessage {
    pub fn user(name: &str, mes: &str) -> Self {
        Self {
            name: name.to_string(),
            is_user: true,
            mes: mes.to_string(),
            ..Default::default()
        }
    }

    pub fn system(mes: &str) -> Self {
        Self {
            name: "Semantix".to_string(),
            is_system: true,
            mes: mes.to_string(),
            ..Default::default()
        }
    }
}

/// Input handed over by the host, in either calling convention.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    Prompt {
        prompt: String,
        chat_history: Vec<ChatMessage>,
    },
    Chat {
        chat: Vec<ChatMessage>,
        context_size: usize,
        aborted: bool,
    },
}

impl HostInput {
    pub fn convention(&self) -> HostConvention {
        match self {
            Self::Prompt { .. } => HostConvention::Prompt,
            Self::Chat { .. } => HostConvention::Chat,
        }
    }

    fn history(&self) -> &[ChatMessage] {
        match self {
            Self::Prompt { chat_history, .. } => chat_history,
            Self::Chat { chat, .. } => chat,
        }
    }

    /// Text of the last message, if it has any.
    pub fn latest_message(&self) -> Option<&str> {
        self.history()
            .last()
            .map(|m| m.mes.as_str())
            .filter(|mes| !mes.trim().is_empty())
    }

    fn inject(self, block: String) -> Self {
        match self {
            Self::Prompt {
                prompt,
                chat_history,
            } => Self::Prompt {
                prompt: format!("{block}\n\n{prompt}"),
                chat_history,
            },
            Self::Chat {
                mut chat,
                context_size,
                aborted,
            } => {
                chat.insert(0, ChatMessage::system(&block));
                Self::Chat {
                    chat,
                    context_size,
                    aborted,
                }
            }
        }
    }
}

/// Bracketed block of hit contents, double-newline separated.
pub fn format_injection(response: &SearchResponse) -> Option<String> {
    if response.results.is_empty() {
        return None;
    }
    let joined = response
        .results
        .iter()
        .map(|hit| hit.payload.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    Some(format!("[Relevant World Info:\n{joined}\n]"))
}

pub struct Interceptor {
    backend: Arc<dyn VectorBackend>,
    settings: InterceptorConfig,
}

impl Interceptor {
    pub fn new(backend: Arc<dyn VectorBackend>, settings: InterceptorConfig) -> Self {
        Self { backend, settings }
    }

    pub fn convention(&self) -> HostConvention {
        self.settings.convention
    }

    /// Inject lore relevant to the latest message, searching the collection
    /// for `lorebook`. Never fails; on any problem `input` comes back as is.
    pub async fn intercept(&self, input: HostInput, lorebook: Option<&str>) -> HostInput {
        if input.convention() != self.settings.convention {
            tracing::warn!(
                expected = ?self.settings.convention,
                got = ?input.convention(),
                "host calling convention does not match configuration"
            );
            return input;
        }
        if let HostInput::Chat { aborted: true, .. } = input {
            tracing::debug!("generation aborted, skipping lore lookup");
            return input;
        }
        let Some(query) = input.latest_message().map(str::to_string) else {
            return input;
        };
        let Some(lorebook) = lorebook.filter(|name| !name.is_empty()) else {
            tracing::debug!("no active lore book, skipping lore lookup");
            return input;
        };

        let request = SearchRequest {
            query_text: query,
            collection_name: format!("{}{}", self.settings.collection_prefix, lorebook),
            limit: self.settings.limit,
            rerank: self.settings.rerank,
        };

        match self.backend.search(&request).await {
            Ok(response) => match format_injection(&response) {
                Some(block) => {
                    tracing::info!(
                        collection = %request.collection_name,
                        hits = response.results.len(),
                        "injected relevant world info"
                    );
                    input.inject(block)
                }
                None => {
                    tracing::debug!(collection = %request.collection_name, "no relevant world info");
                    input
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "lore lookup failed, prompt left unchanged");
                input
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SearchHit, SearchPayload};

    fn hits(contents: &[&str]) -> SearchResponse {
        SearchResponse {
            results: contents
                .iter()
                .map(|c| SearchHit {
                    score: None,
                    payload: SearchPayload {
                        content: c.to_string(),
                        extra: Default::default(),
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn injection_block_format() {
        let block = format_injection(&hits(&["A keep.", "A river."])).unwrap();
        assert_eq!(block, "[Relevant World Info:\nA keep.\n\nA river.\n]");
        assert!(format_injection(&hits(&[])).is_none());
    }

    #[test]
    fn latest_message_skips_blank() {
        let input = HostInput::Prompt {
            prompt: "p".into(),
            chat_history: vec![ChatMessage::user("u", "hello"), ChatMessage::user("u", "  ")],
        };
        assert_eq!(input.latest_message(), None);

        let input = HostInput::Chat {
            chat: vec![ChatMessage::user("u", "where is the keep?")],
            context_size: 4096,
            aborted: false,
        };
        assert_eq!(input.latest_message(), Some("where is the keep?"));
    }

    #[test]
    fn prompt_injection_prepends() {
        let input = HostInput::Prompt {
            prompt: "Story so far".into(),
            chat_history: vec![],
        };
        match input.inject("[X]".into()) {
            HostInput::Prompt { prompt, .. } => assert_eq!(prompt, "[X]\n\nStory so far"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn chat_injection_inserts_system_message_first() {
        let input = HostInput::Chat {
            chat: vec![ChatMessage::user("u", "hi")],
            context_size: 2048,
            aborted: false,
        };
        match input.inject("[X]".into()) {
            HostInput::Chat {
                chat, context_size, ..
            } => {
                assert_eq!(chat.len(), 2);
                assert!(chat[0].is_system);
                assert_eq!(chat[0].mes, "[X]");
                assert_eq!(chat[1].mes, "hi");
                assert_eq!(context_size, 2048);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn chat_message_keeps_host_fields() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"name":"Ana","is_user":true,"mes":"hi","send_date":"today"}"#)
                .unwrap();
        assert_eq!(msg.mes, "hi");
        assert_eq!(msg.extra["send_date"], "today");
    }
}
