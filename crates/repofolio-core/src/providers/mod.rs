// Provider implementations of RepoSource
pub mod github;

pub use github::GitHubProvider;
