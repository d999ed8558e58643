// Core portfolio logic: ranking, rendering, and the page the renderers write into
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod page;
pub mod providers;
pub mod ranking;
pub mod render;
pub mod session;
pub mod source;

pub use config::Config;
pub use error::{Error, LoadStage};
pub use loader::{build_page, load_repos, LoadOutcome};
pub use models::{Profile, Repository};
pub use page::{Element, ElementId, FilterButton, Page};
pub use session::{LanguageFilter, PageEvent, PageSession};
pub use source::RepoSource;

pub type Result<T> = std::result::Result<T, Error>;
