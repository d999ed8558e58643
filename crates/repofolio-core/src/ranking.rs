// Featured/recent selection over a fetched repo list
use crate::models::Repository;
use std::cmp::Ordering;

/// Forks and archived repos never make it into either grid
pub fn clean(repos: Vec<Repository>) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|r| !r.is_fork)
        .filter(|r| !r.is_archived)
        .collect()
}

/// Newest first. Repos without a usable timestamp sink to the bottom.
fn by_recency(a: &Repository, b: &Repository) -> Ordering {
    b.updated_timestamp().cmp(&a.updated_timestamp())
}

/// Top `limit` by stars, ties broken by recency. Stable.
pub fn featured(cleaned: &[Repository], limit: usize) -> Vec<Repository> {
    let mut repos = cleaned.to_vec();
    repos.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| by_recency(a, b)));
    repos.truncate(limit);
    repos
}

/// Top `limit` by recency. Stable.
pub fn recent(cleaned: &[Repository], limit: usize) -> Vec<Repository> {
    let mut repos = cleaned.to_vec();
    repos.sort_by(by_recency);
    repos.truncate(limit);
    repos
}

/// Sum of stars over the given slice (the star counter only ever sees featured)
pub fn total_stars(repos: &[Repository]) -> u64 {
    repos.iter().map(|r| u64::from(r.stars)).sum()
}

/// Both derived collections, computed together from one fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranked {
    pub featured: Vec<Repository>,
    pub recent: Vec<Repository>,
}

impl Ranked {
    pub fn from_fetched(repos: Vec<Repository>, featured_count: usize, max_recent: usize) -> Self {
        let cleaned = clean(repos);
        Self {
            featured: featured(&cleaned, featured_count),
            recent: recent(&cleaned, max_recent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, stars: u32, updated_at: &str) -> Repository {
        Repository {
            name: name.to_string(),
            description: None,
            language: None,
            stars,
            forks: 0,
            updated_at: Some(updated_at.to_string()),
            url: format!("https://github.com/octocat/{}", name),
            homepage_url: None,
            is_fork: false,
            is_archived: false,
        }
    }

    fn names(repos: &[Repository]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_clean_drops_forks_and_archived() {
        let mut fork = repo("fork", 50, "2024-01-01T00:00:00Z");
        fork.is_fork = true;
        let mut archived = repo("archived", 40, "2024-01-02T00:00:00Z");
        archived.is_archived = true;
        let keep = repo("keep", 1, "2024-01-03T00:00:00Z");

        let cleaned = clean(vec![fork, archived, keep]);
        assert_eq!(names(&cleaned), vec!["keep"]);
    }

    #[test]
    fn test_featured_star_tie_goes_to_newer() {
        // Mirrors the octocat example: stars [5, 20, 20], A newer than B
        let repos = vec![
            repo("C", 5, "2024-06-01T00:00:00Z"),
            repo("B", 20, "2024-01-01T00:00:00Z"),
            repo("A", 20, "2024-03-01T00:00:00Z"),
        ];

        let ranked = Ranked::from_fetched(repos, 1, 2);
        assert_eq!(names(&ranked.featured), vec!["A"]);
        assert_eq!(names(&ranked.recent), vec!["C", "A"]);
    }

    #[test]
    fn test_featured_order_law() {
        let repos = vec![
            repo("a", 3, "2024-01-05T00:00:00Z"),
            repo("b", 9, "2023-01-05T00:00:00Z"),
            repo("c", 3, "2024-02-05T00:00:00Z"),
            repo("d", 0, "2025-01-05T00:00:00Z"),
            repo("e", 9, "2024-01-05T00:00:00Z"),
        ];
        let top = featured(&repos, 10);
        assert_eq!(names(&top), vec!["e", "b", "c", "a", "d"]);

        for pair in top.windows(2) {
            assert!(pair[0].stars >= pair[1].stars);
            if pair[0].stars == pair[1].stars {
                assert!(pair[0].updated_timestamp() >= pair[1].updated_timestamp());
            }
        }
    }

    #[test]
    fn test_recent_order_and_cap() {
        let repos = vec![
            repo("old", 100, "2020-01-01T00:00:00Z"),
            repo("new", 0, "2024-01-01T00:00:00Z"),
            repo("mid", 5, "2022-01-01T00:00:00Z"),
            repo("broken", 5, "garbage"),
        ];
        let top = recent(&repos, 3);
        assert_eq!(names(&top), vec!["new", "mid", "old"]);

        let all = recent(&repos, 10);
        assert_eq!(all.last().map(|r| r.name.as_str()), Some("broken"));
        for pair in all.windows(2) {
            assert!(pair[0].updated_timestamp() >= pair[1].updated_timestamp());
        }
    }

    #[test]
    fn test_sort_is_stable_for_full_ties() {
        let repos = vec![
            repo("first", 1, "2024-01-01T00:00:00Z"),
            repo("second", 1, "2024-01-01T00:00:00Z"),
        ];
        assert_eq!(names(&featured(&repos, 2)), vec!["first", "second"]);
        assert_eq!(names(&recent(&repos, 2)), vec!["first", "second"]);
    }

    #[test]
    fn test_zero_caps() {
        let repos = vec![repo("x", 1, "2024-01-01T00:00:00Z")];
        let ranked = Ranked::from_fetched(repos, 0, 0);
        assert!(ranked.featured.is_empty());
        assert!(ranked.recent.is_empty());
    }

    #[test]
    fn test_total_stars() {
        let repos = vec![
            repo("a", 3, "2024-01-01T00:00:00Z"),
            repo("b", u32::MAX, "2024-01-01T00:00:00Z"),
        ];
        assert_eq!(total_stars(&repos), 3 + u64::from(u32::MAX));
        assert_eq!(total_stars(&[]), 0);
    }
}
