//! Semantic world-info for SillyTavern lore books.
//!
//! Semantix lets a user mark a contiguous range of lore entries, sends that
//! range to an external vectorization backend for chunking and embedding, and
//! at generation time prepends the entries most relevant to the latest chat
//! message to the outgoing prompt.
//!
//! # Modules
//!
//! - [`selection`] — Start/end marker state machine, per-entry display state, range extraction
//! - [`session`] — Owned controller that tracks known entries and submits the range
//! - [`lore`] — Lore-book records and the selection summary
//! - [`backend`] — Store/search contract and its HTTP client
//! - [`interceptor`] — Prompt injection for both host calling conventions
//! - [`notify`] — User-visible notices
//! - [`config`] — Configuration loading from TOML files and environment variables

pub mod backend;
pub mod config;
pub mod interceptor;
pub mod lore;
pub mod notify;
pub mod selection;
pub mod session;
