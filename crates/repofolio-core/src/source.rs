use crate::{
    models::{Profile, Repository},
    Result,
};

/// Where the loader gets its data from
///
/// The GitHub provider is the real thing; tests swap in mocks so the loader
/// can be driven without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepoSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile>;

    /// One page of the user's repos, most recently updated first
    async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repository>>;
}
