//! The load sequence: profile, then repos, then rank and render.
//!
//! Nothing escapes [`load_repos`]. Any failure along the way collapses into
//! the fallback message in both grids, and the error comes back inside
//! [`LoadOutcome`] for the caller to log.

use crate::config::Config;
use crate::error::{Error, LoadStage};
use crate::page::{ElementId, Page};
use crate::ranking::{self, Ranked};
use crate::render::{fallback_message, LOADING};
use crate::session::PageSession;
use crate::source::RepoSource;
use tracing::{info, warn};

const COUNT_PLACEHOLDER: &str = "—";

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        featured: usize,
        recent: usize,
        featured_stars: u64,
    },
    Fallback(Error),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Fetch, rank, and render into `page`, updating `session` on success
pub async fn load_repos<S>(
    source: &S,
    config: &Config,
    page: &mut Page,
    session: &mut PageSession,
) -> LoadOutcome
where
    S: RepoSource + ?Sized,
{
    show_loading(page);
    info!("Loading repositories for {}", config.github_username);

    let ranked = match fetch_ranked(source, config, page).await {
        Ok(ranked) => ranked,
        Err(err) => {
            warn!("Falling back to profile link: {}", err);
            show_fallback(page, &config.profile_url());
            return LoadOutcome::Fallback(err);
        }
    };

    // Only the featured set counts toward the star total
    let featured_stars = ranking::total_stars(&ranked.featured);
    if let Some(el) = page.element_mut(ElementId::StarCount) {
        el.set_text(&featured_stars.to_string());
    }

    let outcome = LoadOutcome::Loaded {
        featured: ranked.featured.len(),
        recent: ranked.recent.len(),
        featured_stars,
    };

    session.set_ranked(ranked);
    session.render_featured(page);
    session.render_recent(page);

    info!("Rendered {:?}", outcome);
    outcome
}

/// Standard page for `config`, year stamped, with `filter` (if any)
/// preselected before the load runs. Selecting first means a failed load
/// still leaves the fallback in both grids.
pub async fn build_page<S>(
    source: &S,
    config: &Config,
    filter: Option<&str>,
    year: i32,
) -> (Page, PageSession, LoadOutcome)
where
    S: RepoSource + ?Sized,
{
    let mut page = Page::standard(&config.filters);
    page.stamp_year(year);
    let mut session = PageSession::new();

    if let Some(key) = filter {
        session.select_filter(&key.trim().to_lowercase(), &mut page);
    }

    let outcome = load_repos(source, config, &mut page, &mut session).await;
    (page, session, outcome)
}

/// The two requests, strictly in order. The repo counter is written as soon
/// as the profile arrives, so it survives a later repos failure.
async fn fetch_ranked<S>(source: &S, config: &Config, page: &mut Page) -> crate::Result<Ranked>
where
    S: RepoSource + ?Sized,
{
    let username = config.github_username.as_str();

    let profile = source
        .fetch_profile(username)
        .await
        .map_err(|e| Error::load_failed(LoadStage::User, e))?;

    if let Some(el) = page.element_mut(ElementId::RepoCount) {
        let count = profile
            .public_repos
            .map(|n| n.to_string())
            .unwrap_or_else(|| COUNT_PLACEHOLDER.to_string());
        el.set_text(&count);
    }

    let repos = source
        .fetch_repositories(username)
        .await
        .map_err(|e| Error::load_failed(LoadStage::Repos, e))?;

    Ok(Ranked::from_fetched(
        repos,
        config.featured_count,
        config.max_repos_to_show,
    ))
}

/// Loading text goes into the first grid on the page, recent before featured
fn show_loading(page: &mut Page) {
    let target = [ElementId::RecentGrid, ElementId::FeaturedGrid]
        .into_iter()
        .find(|id| page.has(*id));
    if let Some(el) = target.and_then(|id| page.element_mut(id)) {
        el.set_inner_html(LOADING);
    }
}

fn show_fallback(page: &mut Page, profile_url: &str) {
    page.clear_recent_cards();
    let msg = fallback_message(profile_url);
    for id in [ElementId::FeaturedGrid, ElementId::RecentGrid] {
        if let Some(el) = page.element_mut(id) {
            el.set_inner_html(msg.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, Repository};
    use crate::render::{FEATURED_EMPTY, RECENT_EMPTY};
    use crate::source::MockRepoSource;
    use mockall::{predicate, Sequence};

    fn repo(name: &str, stars: u32, updated_at: &str) -> Repository {
        Repository {
            name: name.to_string(),
            description: None,
            language: Some("Python".to_string()),
            stars,
            forks: 0,
            updated_at: Some(updated_at.to_string()),
            url: format!("https://github.com/octocat/{}", name),
            homepage_url: None,
            is_fork: false,
            is_archived: false,
        }
    }

    fn octocat_config() -> Config {
        Config {
            github_username: "octocat".to_string(),
            max_repos_to_show: 2,
            featured_count: 1,
            ..Config::default()
        }
    }

    fn profile(public_repos: Option<u32>) -> Profile {
        Profile {
            login: "octocat".to_string(),
            public_repos,
        }
    }

    fn text(page: &Page, id: ElementId) -> String {
        page.element(id).map(|e| e.inner_html().to_string()).unwrap_or_default()
    }

    fn not_found() -> Error {
        Error::ApiError("Not found: octocat".to_string())
    }

    #[tokio::test]
    async fn test_octocat_scenario() {
        let mut source = MockRepoSource::new();
        let mut seq = Sequence::new();
        source
            .expect_fetch_profile()
            .with(predicate::function(|u: &str| u == "octocat"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(profile(Some(3))));
        source
            .expect_fetch_repositories()
            .with(predicate::function(|u: &str| u == "octocat"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![
                    repo("C", 5, "2024-06-01T00:00:00Z"),
                    repo("B", 20, "2024-01-01T00:00:00Z"),
                    repo("A", 20, "2024-03-01T00:00:00Z"),
                ])
            });

        let mut page = Page::standard(&[]);
        let mut session = PageSession::new();
        let outcome = load_repos(&source, &octocat_config(), &mut page, &mut session).await;

        assert!(outcome.is_loaded());
        let featured: Vec<&str> = session.featured().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(featured, vec!["A"]);
        let recent: Vec<&str> = session.recent().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(recent, vec!["C", "A"]);

        assert_eq!(text(&page, ElementId::RepoCount), "3");
        assert_eq!(text(&page, ElementId::StarCount), "20");
        assert!(text(&page, ElementId::FeaturedGrid).contains("<h3>A</h3>"));
        assert!(!text(&page, ElementId::FeaturedGrid).contains("<h3>B</h3>"));
        assert_eq!(text(&page, ElementId::RecentGrid).matches("<article").count(), 2);
    }

    #[tokio::test]
    async fn test_user_404_falls_back_without_fetching_repos() {
        let mut source = MockRepoSource::new();
        source
            .expect_fetch_profile()
            .times(1)
            .returning(|_| Err(not_found()));
        source.expect_fetch_repositories().times(0);

        let mut page = Page::standard(&[]);
        let mut session = PageSession::new();
        let outcome = load_repos(&source, &octocat_config(), &mut page, &mut session).await;

        match outcome {
            LoadOutcome::Fallback(Error::LoadFailed { stage, .. }) => {
                assert_eq!(stage, LoadStage::User)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        for id in [ElementId::FeaturedGrid, ElementId::RecentGrid] {
            assert!(text(&page, id).contains(r#"href="https://github.com/octocat""#));
        }
        assert_eq!(text(&page, ElementId::RepoCount), "—");
        assert_eq!(text(&page, ElementId::StarCount), "—");
        assert!(session.featured().is_empty());
        assert!(page.recent_cards().is_none());
    }

    #[tokio::test]
    async fn test_repos_failure_keeps_repo_counter() {
        let mut source = MockRepoSource::new();
        source
            .expect_fetch_profile()
            .returning(|_| Ok(profile(Some(12))));
        source
            .expect_fetch_repositories()
            .returning(|_| Err(not_found()));

        let mut page = Page::standard(&[]);
        let mut session = PageSession::new();
        let outcome = load_repos(&source, &octocat_config(), &mut page, &mut session).await;

        match outcome {
            LoadOutcome::Fallback(err) => {
                assert!(err.to_string().starts_with("Failed to load GitHub repos"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(text(&page, ElementId::RepoCount), "12");
        assert!(text(&page, ElementId::RecentGrid).contains("Couldn’t load repositories"));
    }

    #[tokio::test]
    async fn test_missing_public_repos_uses_placeholder() {
        let mut source = MockRepoSource::new();
        source.expect_fetch_profile().returning(|_| Ok(profile(None)));
        source.expect_fetch_repositories().returning(|_| Ok(Vec::new()));

        let mut page = Page::standard(&[]);
        let mut session = PageSession::new();
        let outcome = load_repos(&source, &Config::default(), &mut page, &mut session).await;

        assert!(outcome.is_loaded());
        assert_eq!(text(&page, ElementId::RepoCount), "—");
        assert_eq!(text(&page, ElementId::StarCount), "0");
        assert_eq!(text(&page, ElementId::FeaturedGrid), FEATURED_EMPTY);
        assert_eq!(text(&page, ElementId::RecentGrid), RECENT_EMPTY);
    }

    #[tokio::test]
    async fn test_forks_and_archived_never_rendered() {
        let mut source = MockRepoSource::new();
        source.expect_fetch_profile().returning(|_| Ok(profile(Some(3))));
        source.expect_fetch_repositories().returning(|_| {
            let mut fork = repo("forked", 100, "2024-05-01T00:00:00Z");
            fork.is_fork = true;
            let mut archived = repo("dusty", 90, "2024-05-02T00:00:00Z");
            archived.is_archived = true;
            Ok(vec![fork, archived, repo("own", 1, "2024-01-01T00:00:00Z")])
        });

        let mut page = Page::standard(&[]);
        let mut session = PageSession::new();
        load_repos(&source, &Config::default(), &mut page, &mut session).await;

        for r in session.featured().iter().chain(session.recent()) {
            assert!(!r.is_fork && !r.is_archived);
        }
        assert_eq!(text(&page, ElementId::StarCount), "1");
        assert!(!text(&page, ElementId::FeaturedGrid).contains("forked"));
        assert!(!text(&page, ElementId::RecentGrid).contains("dusty"));
    }

    #[tokio::test]
    async fn test_reload_keeps_current_filter() {
        let mut source = MockRepoSource::new();
        source.expect_fetch_profile().returning(|_| Ok(profile(Some(2))));
        source.expect_fetch_repositories().returning(|_| {
            let mut js = repo("js", 1, "2024-02-01T00:00:00Z");
            js.language = Some("JavaScript".to_string());
            Ok(vec![js, repo("py", 1, "2024-01-01T00:00:00Z")])
        });

        let mut page = Page::standard(&["All".to_string(), "Python".to_string()]);
        let mut session = PageSession::new();
        session.select_filter("python", &mut page);
        load_repos(&source, &Config::default(), &mut page, &mut session).await;

        let recent = text(&page, ElementId::RecentGrid);
        assert!(recent.contains("<h3>py</h3>"));
        assert!(!recent.contains("<h3>js</h3>"));
        // Featured ignores the filter
        assert!(text(&page, ElementId::FeaturedGrid).contains("<h3>js</h3>"));
    }

    #[tokio::test]
    async fn test_load_into_empty_page_is_quiet() {
        let mut source = MockRepoSource::new();
        source.expect_fetch_profile().returning(|_| Ok(profile(Some(1))));
        source
            .expect_fetch_repositories()
            .returning(|_| Ok(vec![repo("x", 1, "2024-01-01T00:00:00Z")]));

        let mut page = Page::empty();
        let mut session = PageSession::new();
        let outcome = load_repos(&source, &Config::default(), &mut page, &mut session).await;

        assert!(outcome.is_loaded());
        assert_eq!(page, Page::empty());
        assert_eq!(session.recent().len(), 1);
    }

    #[tokio::test]
    async fn test_preselected_filter_keeps_fallback_on_failure() {
        let mut source = MockRepoSource::new();
        source.expect_fetch_profile().returning(|_| Err(not_found()));
        source.expect_fetch_repositories().times(0);

        let (page, session, outcome) =
            build_page(&source, &octocat_config(), Some("Python"), 2026).await;

        assert!(!outcome.is_loaded());
        assert_eq!(session.filter().key(), "python");
        for id in [ElementId::FeaturedGrid, ElementId::RecentGrid] {
            assert!(text(&page, id).contains("https://github.com/octocat"));
            assert_ne!(text(&page, id), RECENT_EMPTY);
        }
    }

    #[tokio::test]
    async fn test_preselected_filter_applies_after_load() {
        let mut source = MockRepoSource::new();
        source.expect_fetch_profile().returning(|_| Ok(profile(Some(2))));
        source.expect_fetch_repositories().returning(|_| {
            let mut rusty = repo("rusty", 1, "2024-02-01T00:00:00Z");
            rusty.language = Some("Rust".to_string());
            Ok(vec![rusty, repo("py", 1, "2024-01-01T00:00:00Z")])
        });

        let config = Config {
            max_repos_to_show: 5,
            ..octocat_config()
        };
        let (page, _, outcome) = build_page(&source, &config, Some(" python "), 2026).await;

        assert!(outcome.is_loaded());
        let recent = text(&page, ElementId::RecentGrid);
        assert!(recent.contains("<h3>py</h3>"));
        assert!(!recent.contains("<h3>rusty</h3>"));
        assert_eq!(text(&page, ElementId::Year), "2026");
        let python = page.filter_button_index("python").unwrap();
        assert!(page.filter_buttons()[python].is_active());
    }

    #[test]
    fn test_loading_goes_to_recent_grid_first() {
        let mut page = Page::standard(&[]);
        show_loading(&mut page);
        assert_eq!(text(&page, ElementId::RecentGrid), LOADING);
        assert_eq!(text(&page, ElementId::FeaturedGrid), "");

        page.remove(ElementId::RecentGrid);
        show_loading(&mut page);
        assert_eq!(text(&page, ElementId::FeaturedGrid), LOADING);
    }
}
