// Per-page state: the two derived collections and the active language filter
use crate::models::Repository;
use crate::page::{ElementId, Page};
use crate::ranking::Ranked;
use crate::render::{lang_key, repo_card, CardVariant, FEATURED_EMPTY, RECENT_EMPTY};
use tracing::debug;

const ALL: &str = "all";

/// Language filter for the recent grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageFilter {
    #[default]
    All,
    /// A normalized language key; the empty key means "no language"
    Language(String),
}

impl LanguageFilter {
    pub fn from_key(key: &str) -> Self {
        if key == ALL {
            LanguageFilter::All
        } else {
            LanguageFilter::Language(key.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            LanguageFilter::All => ALL,
            LanguageFilter::Language(key) => key.as_str(),
        }
    }

    pub fn matches(&self, repo: &Repository) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Language(key) => lang_key(repo.language.as_deref()) == *key,
        }
    }
}

impl std::fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Interactions the page reacts to after the initial load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Click on the filter chip at this index
    FilterClicked(usize),
    NavToggleClicked,
    /// Click on any link inside the nav menu
    NavLinkClicked,
}

/// Lives for one page view. Nothing here touches the network.
#[derive(Debug, Clone, Default)]
pub struct PageSession {
    featured: Vec<Repository>,
    recent: Vec<Repository>,
    filter: LanguageFilter,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn featured(&self) -> &[Repository] {
        &self.featured
    }

    pub fn recent(&self) -> &[Repository] {
        &self.recent
    }

    pub fn filter(&self) -> &LanguageFilter {
        &self.filter
    }

    /// Replace both collections wholesale; the filter is left alone
    pub fn set_ranked(&mut self, ranked: Ranked) {
        self.featured = ranked.featured;
        self.recent = ranked.recent;
    }

    /// Recent repos that pass the current filter, in order
    pub fn visible_recent(&self) -> Vec<&Repository> {
        self.recent
            .iter()
            .filter(|r| self.filter.matches(r))
            .collect()
    }

    pub fn render_featured(&self, page: &mut Page) {
        let Some(grid) = page.element_mut(ElementId::FeaturedGrid) else {
            return;
        };
        if self.featured.is_empty() {
            grid.set_inner_html(FEATURED_EMPTY);
        } else {
            grid.set_inner_html(join_cards(self.featured.iter(), CardVariant::Featured));
        }
    }

    pub fn render_recent(&self, page: &mut Page) {
        if !page.has(ElementId::RecentGrid) {
            return;
        }
        page.set_recent_cards(join_cards(self.recent.iter(), CardVariant::Recent));

        let Some(grid) = page.element_mut(ElementId::RecentGrid) else {
            return;
        };
        let visible = self.visible_recent();
        if visible.is_empty() {
            grid.set_inner_html(RECENT_EMPTY);
        } else {
            grid.set_inner_html(join_cards(visible.into_iter(), CardVariant::Recent));
        }
    }

    /// Set the filter without going through a chip, then re-render recent.
    /// Chip highlighting follows when a chip for `key` exists.
    pub fn select_filter(&mut self, key: &str, page: &mut Page) {
        match page.filter_button_index(key) {
            Some(index) => self.handle(PageEvent::FilterClicked(index), page),
            None => {
                self.filter = LanguageFilter::from_key(key);
                self.render_recent(page);
            }
        }
    }

    pub fn handle(&mut self, event: PageEvent, page: &mut Page) {
        match event {
            PageEvent::FilterClicked(index) => self.on_filter_clicked(index, page),
            PageEvent::NavToggleClicked => toggle_nav(page),
            PageEvent::NavLinkClicked => close_nav(page),
        }
    }

    fn on_filter_clicked(&mut self, index: usize, page: &mut Page) {
        let Some(key) = page.filter_buttons().get(index).map(|b| b.key().to_string()) else {
            return;
        };

        for (i, button) in page.filter_buttons_mut().iter_mut().enumerate() {
            if i == index {
                button.element_mut().add_class("active");
            } else {
                button.element_mut().remove_class("active");
            }
        }

        debug!("Filter set to {:?}", key);
        self.filter = LanguageFilter::from_key(&key);
        self.render_recent(page);
    }
}

fn join_cards<'a>(repos: impl Iterator<Item = &'a Repository>, variant: CardVariant) -> String {
    repos.map(|r| repo_card(r, variant)).collect()
}

/// Both the toggle and the menu have to be on the page for the menu to work
fn nav_present(page: &Page) -> bool {
    page.has(ElementId::NavToggle) && page.has(ElementId::NavLinks)
}

fn set_expanded(page: &mut Page, open: bool) {
    if let Some(toggle) = page.element_mut(ElementId::NavToggle) {
        toggle.set_attr("aria-expanded", if open { "true" } else { "false" });
    }
}

fn toggle_nav(page: &mut Page) {
    if !nav_present(page) {
        return;
    }
    let open = page
        .element_mut(ElementId::NavLinks)
        .map(|links| links.toggle_class("open"))
        .unwrap_or(false);
    set_expanded(page, open);
}

fn close_nav(page: &mut Page) {
    if !nav_present(page) || page.nav_link_count() == 0 {
        return;
    }
    if let Some(links) = page.element_mut(ElementId::NavLinks) {
        links.remove_class("open");
    }
    set_expanded(page, false);
}
