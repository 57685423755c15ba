//! GitHub-side glue: the pull-request event payload and the REST calls
//! around the summary (diff fetch, comment posting).

pub mod client;
pub mod event;

pub use client::GithubClient;
pub use event::PullRequestEvent;
