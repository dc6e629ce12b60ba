//! CLI `inject` command — run the interceptor the way the host would.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use semantix::backend::{HttpBackend, VectorBackend};
use semantix::config::{HostConvention, SemantixConfig};
use semantix::interceptor::{ChatMessage, HostInput, Interceptor};

pub async fn inject(
    config: &SemantixConfig,
    lorebook: Option<&str>,
    chat_path: &Path,
    prompt: String,
    context_size: usize,
) -> Result<()> {
    let json = std::fs::read_to_string(chat_path)
        .with_context(|| format!("failed to read chat file: {}", chat_path.display()))?;
    let chat: Vec<ChatMessage> =
        serde_json::from_str(&json).context("failed to parse chat JSON")?;

    let backend: Arc<dyn VectorBackend> =
        Arc::new(HttpBackend::from_config(config).context("failed to configure backend")?);
    let interceptor = Interceptor::new(backend, config.interceptor.clone());

    let input = match interceptor.convention() {
        HostConvention::Prompt => HostInput::Prompt {
            prompt,
            chat_history: chat,
        },
        HostConvention::Chat => HostInput::Chat {
            chat,
            context_size,
            aborted: false,
        },
    };

    match interceptor.intercept(input, lorebook).await {
        HostInput::Prompt { prompt, .. } => println!("{prompt}"),
        HostInput::Chat { chat, .. } => println!("{}", serde_json::to_string_pretty(&chat)?),
    }
    Ok(())
}
