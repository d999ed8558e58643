//! In-memory page document.
//!
//! Every element the renderers touch is optional. Lookups hand back an
//! `Option`, and callers treat `None` as "feature not on this page".

use crate::render::{escape_html, lang_key, RECENT_EMPTY};
use std::collections::{BTreeMap, BTreeSet};

/// The singular elements a portfolio page may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementId {
    Year,
    NavToggle,
    NavLinks,
    FeaturedGrid,
    RecentGrid,
    RepoCount,
    StarCount,
}

impl ElementId {
    pub fn all() -> [ElementId; 7] {
        [
            ElementId::Year,
            ElementId::NavToggle,
            ElementId::NavLinks,
            ElementId::FeaturedGrid,
            ElementId::RecentGrid,
            ElementId::RepoCount,
            ElementId::StarCount,
        ]
    }

    /// The `id` attribute used when the page is serialized
    pub fn dom_id(&self) -> &'static str {
        match self {
            ElementId::Year => "year",
            ElementId::NavToggle => "navToggle",
            ElementId::NavLinks => "navLinks",
            ElementId::FeaturedGrid => "featuredGrid",
            ElementId::RecentGrid => "projectGrid",
            ElementId::RepoCount => "repoCount",
            ElementId::StarCount => "starCount",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            ElementId::NavToggle => "button",
            ElementId::NavLinks => "ul",
            ElementId::FeaturedGrid | ElementId::RecentGrid => "div",
            ElementId::Year | ElementId::RepoCount | ElementId::StarCount => "span",
        }
    }
}

/// A mutable element: inner markup, class list and attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    inner_html: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
    }

    /// Like `textContent =`: the text is escaped, never parsed as markup
    pub fn set_text(&mut self, text: &str) {
        self.inner_html = escape_html(Some(text));
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Flip `class`, returning whether it is now present
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.classes.remove(class) {
            false
        } else {
            self.classes.insert(class.to_string());
            true
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn to_html(&self, tag: &str, id: Option<&str>) -> String {
        let mut out = format!("<{}", tag);
        if let Some(id) = id {
            out.push_str(&format!(r#" id="{}""#, id));
        }
        if !self.classes.is_empty() {
            let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
            out.push_str(&format!(r#" class="{}""#, classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            out.push_str(&format!(r#" {}="{}""#, name, escape_html(Some(value.as_str()))));
        }
        out.push('>');
        out.push_str(&self.inner_html);
        out.push_str(&format!("</{}>", tag));
        out
    }
}

/// A language filter chip. The key lives in `data-filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    label: String,
    element: Element,
}

impl FilterButton {
    /// "All" (any case) becomes the catch-all key, anything else its language key
    pub fn from_label(label: &str) -> Self {
        let key = if label.trim().eq_ignore_ascii_case("all") {
            "all".to_string()
        } else {
            lang_key(Some(label))
        };
        Self {
            label: label.to_string(),
            element: Element::new()
                .with_class("chip-btn")
                .with_attr("type", "button")
                .with_attr("data-filter", &key),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn key(&self) -> &str {
        self.element.attr("data-filter").unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.element.has_class("active")
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }
}

/// The whole page: optional singular elements plus any number of filter chips
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    elements: BTreeMap<ElementId, Element>,
    filter_buttons: Vec<FilterButton>,
    nav_entries: Vec<(String, String)>,
    /// Every recent card, unfiltered, so the browser can re-filter client-side
    recent_cards: Option<String>,
}

impl Page {
    /// A page with nothing on it; every feature is a no-op
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard portfolio layout with every element present.
    /// The first button (if any) starts out active.
    pub fn standard(filter_labels: &[String]) -> Self {
        let mut page = Self::empty();
        page.insert(ElementId::Year, Element::new());
        page.insert(
            ElementId::NavToggle,
            Element::new()
                .with_class("nav-toggle")
                .with_attr("aria-expanded", "false")
                .with_attr("aria-label", "Toggle navigation")
                .with_html("☰"),
        );
        page.insert(ElementId::NavLinks, Element::new().with_class("nav-links"));
        page.insert(ElementId::FeaturedGrid, Element::new().with_class("grid"));
        page.insert(ElementId::RecentGrid, Element::new().with_class("grid"));
        page.insert(ElementId::RepoCount, Element::new().with_html("—"));
        page.insert(ElementId::StarCount, Element::new().with_html("—"));

        page.nav_entries = [("Featured", "#featured"), ("Projects", "#projects")]
            .iter()
            .map(|(label, href)| (label.to_string(), href.to_string()))
            .collect();
        page.sync_nav_links();

        page.filter_buttons = filter_labels
            .iter()
            .map(|label| FilterButton::from_label(label))
            .collect();
        if let Some(first) = page.filter_buttons.first_mut() {
            first.element_mut().add_class("active");
        }
        page
    }

    pub fn insert(&mut self, id: ElementId, element: Element) {
        self.elements.insert(id, element);
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn has(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn filter_buttons(&self) -> &[FilterButton] {
        &self.filter_buttons
    }

    pub fn filter_buttons_mut(&mut self) -> &mut [FilterButton] {
        &mut self.filter_buttons
    }

    /// Index of the first chip bound to `key`
    pub fn filter_button_index(&self, key: &str) -> Option<usize> {
        self.filter_buttons.iter().position(|b| b.key() == key)
    }

    pub fn recent_cards(&self) -> Option<&str> {
        self.recent_cards.as_deref()
    }

    pub fn set_recent_cards(&mut self, html: String) {
        self.recent_cards = Some(html);
    }

    pub fn clear_recent_cards(&mut self) {
        self.recent_cards = None;
    }

    pub fn nav_link_count(&self) -> usize {
        self.nav_entries.len()
    }

    /// Writes the current year into the footer placeholder, if there is one
    pub fn stamp_year(&mut self, year: i32) {
        if let Some(el) = self.element_mut(ElementId::Year) {
            el.set_text(&year.to_string());
        }
    }

    fn sync_nav_links(&mut self) {
        let links: String = self
            .nav_entries
            .iter()
            .map(|(label, href)| {
                format!(
                    r##"<li><a href="{}">{}</a></li>"##,
                    escape_html(Some(href.as_str())),
                    escape_html(Some(label.as_str()))
                )
            })
            .collect();
        if let Some(el) = self.element_mut(ElementId::NavLinks) {
            el.set_inner_html(links);
        }
    }

    fn fragment(&self, id: ElementId) -> String {
        self.element(id)
            .map(|el| el.to_html(id.tag(), Some(id.dom_id())))
            .unwrap_or_default()
    }

    fn filter_bar(&self) -> String {
        if self.filter_buttons.is_empty() {
            return String::new();
        }
        let chips: String = self
            .filter_buttons
            .iter()
            .map(|b| {
                let mut el = b.element().clone();
                el.set_text(b.label());
                el.to_html("button", None)
            })
            .collect();
        format!(r#"<div class="filters" role="group" aria-label="Filter by language">{}</div>"#, chips)
    }

    fn recent_template(&self) -> String {
        match (&self.recent_cards, self.has(ElementId::RecentGrid)) {
            (Some(cards), true) => format!(r#"<template id="recentCards">{}</template>"#, cards),
            _ => String::new(),
        }
    }

    /// Serialize to a standalone HTML document
    pub fn to_html(&self, title: &str, profile_url: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <header class="site-header">
        <nav class="nav">
            <a class="brand" href="{profile_url}" target="_blank" rel="noreferrer">{title}</a>
            {nav_toggle}
            {nav_links}
        </nav>
    </header>
    <main>
        <section class="stats">
            <div><strong>{repo_count}</strong> public repos</div>
            <div><strong>{star_count}</strong> stars on featured work</div>
        </section>
        <section id="featured">
            <h2>Featured</h2>
            {featured_grid}
        </section>
        <section id="projects">
            <h2>Recent projects</h2>
            {filters}
            {recent_grid}
            {recent_template}
        </section>
    </main>
    <footer>&copy; {year}</footer>
    <script>{js}</script>
</body>
</html>
"#,
            title = escape_html(Some(title)),
            css = inline_css(),
            profile_url = escape_html(Some(profile_url)),
            nav_toggle = self.fragment(ElementId::NavToggle),
            nav_links = self.fragment(ElementId::NavLinks),
            repo_count = self.fragment(ElementId::RepoCount),
            star_count = self.fragment(ElementId::StarCount),
            featured_grid = self.fragment(ElementId::FeaturedGrid),
            filters = self.filter_bar(),
            recent_grid = self.fragment(ElementId::RecentGrid),
            recent_template = self.recent_template(),
            js = inline_javascript(),
            year = self.fragment(ElementId::Year),
        )
    }
}

/// Browser-side nav toggle and chip filtering. Chips rebuild the recent grid
/// from `#recentCards`; without that template (failed load) they only move
/// the highlight.
fn inline_javascript() -> String {
    r#"
(function () {
  var toggle = document.getElementById("navToggle");
  var links = document.getElementById("navLinks");
  if (toggle && links) {
    toggle.addEventListener("click", function () {
      var open = links.classList.toggle("open");
      toggle.setAttribute("aria-expanded", String(open));
    });
    links.querySelectorAll("a").forEach(function (a) {
      a.addEventListener("click", function () {
        links.classList.remove("open");
        toggle.setAttribute("aria-expanded", "false");
      });
    });
  }

  var grid = document.getElementById("projectGrid");
  var cards = document.getElementById("recentCards");
  var chips = document.querySelectorAll(".chip-btn");
  chips.forEach(function (btn) {
    btn.addEventListener("click", function () {
      chips.forEach(function (b) { b.classList.remove("active"); });
      btn.classList.add("active");
      if (!grid || !cards) return;
      var key = btn.getAttribute("data-filter");
      var html = "";
      cards.content.querySelectorAll("article.card").forEach(function (card) {
        if (key === "all" || card.getAttribute("data-lang") === key) html += card.outerHTML;
      });
      grid.innerHTML = html || '__EMPTY__';
    });
  });
})();
"#
    .replace("__EMPTY__", RECENT_EMPTY)
}

fn inline_css() -> &'static str {
    r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2328; background: #f6f8fa; }
main, .nav { max-width: 1100px; margin: 0 auto; padding: 1rem; }
.nav { display: flex; align-items: center; justify-content: space-between; }
.nav-links { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
.nav-toggle { display: none; }
@media (max-width: 700px) {
  .nav-toggle { display: block; }
  .nav-links { display: none; }
  .nav-links.open { display: flex; flex-direction: column; }
}
.stats { display: flex; gap: 2rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1rem; }
.card { background: #fff; border: 1px solid #d0d7de; border-radius: 8px; padding: 1rem; }
.muted { color: #57606a; }
.meta { list-style: none; padding: 0; font-size: 0.9rem; }
.actions { display: flex; gap: 0.75rem; }
.filters { display: flex; gap: 0.5rem; flex-wrap: wrap; margin-bottom: 1rem; }
.chip-btn { border: 1px solid #d0d7de; border-radius: 999px; background: #fff; padding: 0.25rem 0.75rem; }
.chip-btn.active { background: #1f2328; color: #fff; }
"#
}
