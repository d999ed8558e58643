// GitHub provider - bridges the API client with the RepoSource trait
use async_trait::async_trait;
use repofolio_api::{github::MAX_PER_PAGE, GitHubClient, GitHubRepo, GitHubUser};

use crate::{
    models::{Profile, Repository},
    source::RepoSource,
    Error, Result,
};

/// Wrapper around GitHubClient that implements RepoSource
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = GitHubClient::with_base_url(api_url.to_string())
            .map_err(|e| Error::ApiError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RepoSource for GitHubProvider {
    async fn fetch_profile(&self, username: &str) -> Result<Profile> {
        let user = self
            .client
            .get_user(username)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))?;

        Ok(github_to_profile(user))
    }

    async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        let repos = self
            .client
            .list_user_repos(username, MAX_PER_PAGE)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))?;

        Ok(repos.into_iter().map(github_to_repo).collect())
    }
}

fn github_to_profile(user: GitHubUser) -> Profile {
    Profile {
        login: user.login,
        public_repos: user.public_repos,
    }
}

/// Convert GitHub API repo to our internal Repository model
fn github_to_repo(gh: GitHubRepo) -> Repository {
    Repository {
        name: gh.name,
        description: gh.description,
        language: gh.language,
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        updated_at: gh.updated_at,
        url: gh.html_url,
        homepage_url: gh.homepage,
        is_fork: gh.fork,
        is_archived: gh.archived,
    }
}
