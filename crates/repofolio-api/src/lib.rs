// API client for the GitHub REST endpoints the portfolio reads
pub mod github;

// Re-export common types
pub use github::{GitHubClient, GitHubError, GitHubRepo, GitHubUser};
