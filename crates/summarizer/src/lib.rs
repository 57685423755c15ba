//! Bilingual pull-request summarization: diff truncation, prompt
//! construction, and the chat-completions call that produces the comment
//! body.

pub mod client;
pub mod prompt;

pub use client::SummaryClient;
pub use prompt::{build_prompt, truncate_diff};
