//! CLI `vectorize` command — send a marked range to the backend.

use anyhow::{Context, Result};
use std::path::Path;

use semantix::backend::HttpBackend;
use semantix::config::SemantixConfig;
use semantix::lore::LoreBook;
use semantix::notify::LogNotifier;
use semantix::selection::{EntryId, MarkerType};

pub async fn vectorize(
    config: &SemantixConfig,
    book_path: &Path,
    marks: &[(MarkerType, EntryId)],
) -> Result<()> {
    let book = LoreBook::load(book_path)?;
    let session = super::session_for(&book, marks, config.module.show_notifications);

    if let Some(summary) = session.summary(&book) {
        println!("{summary}");
        println!();
    }

    let backend = HttpBackend::from_config(config).context("failed to configure backend")?;
    let submission = session
        .submit(&book, &backend, &LogNotifier)
        .await
        .context("vectorization failed")?;

    println!(
        "Stored entries {}..={} ({} entries): {} chunks processed, {} vectors stored",
        submission.start,
        submission.end,
        submission.entries,
        submission.result.chunks_processed,
        submission.result.points_stored
    );
    Ok(())
}
