use anyhow::{Context, Result};

use semantix::backend::{HttpBackend, SearchRequest, VectorBackend};
use semantix::config::SemantixConfig;

/// Run a search against a lore book's collection from the terminal.
pub async fn search(
    config: &SemantixConfig,
    query: &str,
    lorebook: &str,
    limit: Option<usize>,
    rerank: bool,
) -> Result<()> {
    let backend = HttpBackend::from_config(config).context("failed to configure backend")?;

    let request = SearchRequest {
        query_text: query.to_string(),
        collection_name: config.collection_name(lorebook),
        limit: limit.unwrap_or(config.interceptor.limit),
        rerank,
    };

    let response = backend
        .search(&request)
        .await
        .with_context(|| format!("search in {} failed", request.collection_name))?;

    if response.results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!(
        "Found {} result(s) in {}\n",
        response.results.len(),
        request.collection_name
    );

    for (i, hit) in response.results.iter().enumerate() {
        let preview = semantix::lore::summary::excerpt(&hit.payload.content);
        match hit.score {
            Some(score) => println!("  {}. (score: {:.4})", i + 1, score),
            None => println!("  {}.", i + 1),
        }
        println!("     {}", preview);
        println!();
    }

    Ok(())
}
