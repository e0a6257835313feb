pub mod github;

pub use github::{history_entries_from_listing, GithubDigestSource};
