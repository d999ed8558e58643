//! Markup fragments for repository cards and the fixed grid messages.
//!
//! Everything here is a pure function of its input. Text coming from the API
//! goes through [`escape_html`] exactly once, right where it is interpolated.

use crate::models::{parse_timestamp, Repository};

pub const FEATURED_EMPTY: &str =
    r#"<div class="muted">No featured repositories found yet.</div>"#;
pub const RECENT_EMPTY: &str =
    r#"<div class="muted">No repositories match this filter yet.</div>"#;
pub const LOADING: &str = r#"<div class="muted">Loading repositories from GitHub…</div>"#;

const DESCRIPTION_FALLBACK: &str = "Repository on GitHub.";
const NO_LANGUAGE: &str = "—";

/// Which grid a card is rendered for. Only the meta labels differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardVariant {
    Featured,
    #[default]
    Recent,
}

impl CardVariant {
    fn labels(&self) -> [&'static str; 3] {
        match self {
            CardVariant::Featured => ["Primary tool:", "Last update:", "Stars/Forks:"],
            CardVariant::Recent => ["Language:", "Updated:", "Stars/Forks:"],
        }
    }
}

/// Replace `& < > " '` with character references, `&` first.
///
/// Not idempotent: a second pass turns `&amp;` into `&amp;amp;`.
pub fn escape_html(input: Option<&str>) -> String {
    input
        .unwrap_or_default()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// "Mon YYYY" for an ISO timestamp, empty string when it doesn't parse.
///
/// Always English month abbreviations (`Feb 2024`), whatever the host locale.
pub fn format_date(iso: &str) -> String {
    parse_timestamp(iso)
        .map(|ts| ts.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// Filter key for a language label. No language is the empty key, which is
/// distinct from "all".
pub fn lang_key(language: Option<&str>) -> String {
    language.unwrap_or_default().trim().to_lowercase()
}

/// One `<article class="card">` for `repo`
pub fn repo_card(repo: &Repository, variant: CardVariant) -> String {
    let language = repo
        .language
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or(NO_LANGUAGE);
    let description = repo
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(DESCRIPTION_FALLBACK);
    let updated = format_date(repo.updated_at.as_deref().unwrap_or_default());
    let [tool_label, date_label, counts_label] = variant.labels();

    let live = repo
        .live_url()
        .map(|url| {
            format!(
                r#"<a class="link" href="{}" target="_blank" rel="noreferrer">Live</a>"#,
                escape_html(Some(url))
            )
        })
        .unwrap_or_default();

    format!(
        r#"
    <article class="card" data-lang="{lang_key}">
      <h3>{name}</h3>
      <p class="muted">{description}</p>
      <ul class="meta">
        <li><strong>{tool_label}</strong> {language}</li>
        <li><strong>{date_label}</strong> {updated}</li>
        <li><strong>{counts_label}</strong> {stars} / {forks}</li>
      </ul>
      <div class="actions">
        <a class="link" href="{code_url}" target="_blank" rel="noreferrer">Code</a>
        {live}
      </div>
    </article>
  "#,
        lang_key = escape_html(Some(lang_key(repo.language.as_deref()).as_str())),
        name = escape_html(Some(repo.name.as_str())),
        description = escape_html(Some(description)),
        language = escape_html(Some(language)),
        stars = repo.stars,
        forks = repo.forks,
        code_url = escape_html(Some(repo.url.as_str())),
    )
}

/// Shown in every grid when the load sequence fails
pub fn fallback_message(profile_url: &str) -> String {
    format!(
        r#"
      <div class="muted">
        Couldn’t load repositories right now. You can still view them on
        <a class="link" href="{}" target="_blank" rel="noreferrer">GitHub</a>.
      </div>
    "#,
        escape_html(Some(profile_url))
    )
}
