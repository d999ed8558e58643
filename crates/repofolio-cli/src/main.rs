use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use repofolio_core::{
    build_page, providers::GitHubProvider, ranking::Ranked, render::format_date, Config,
    LoadOutcome, RepoSource, Repository,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repofolio")]
#[command(version, about = "Portfolio page generator for your public GitHub repositories", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/repofolio/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub username to showcase
    #[arg(long, global = true, env = "REPOFOLIO_USERNAME")]
    username: Option<String>,

    /// How many repos the recent grid shows
    #[arg(long, global = true)]
    max_repos: Option<usize>,

    /// How many repos the featured grid shows
    #[arg(long, global = true)]
    featured: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Fetch repositories and write the portfolio page
    Build {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Preselect a language filter for the recent grid (e.g. "python")
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the featured and recent selections
    List {
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `build` can write the page to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repofolio=info,repofolio_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path().context("Could not resolve config path")?,
    };

    match &cli.command {
        Commands::Init { force } => init_config(&config_path, *force),
        Commands::Build { out, filter } => {
            let config = effective_config(&cli, &config_path)?;
            build(&config, out.as_ref(), filter.as_deref()).await
        }
        Commands::List { json } => {
            let config = effective_config(&cli, &config_path)?;
            list(&config, *json).await
        }
    }
}

/// File values, then CLI/env overrides on top
fn effective_config(cli: &Cli, path: &std::path::Path) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(username) = &cli.username {
        config.github_username = username.clone();
    }
    if let Some(max) = cli.max_repos {
        config.max_repos_to_show = max;
    }
    if let Some(featured) = cli.featured {
        config.featured_count = featured;
    }

    tracing::debug!("Effective config: {:?}", config);
    Ok(config)
}

fn init_config(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default()
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

async fn build(config: &Config, out: Option<&PathBuf>, filter: Option<&str>) -> anyhow::Result<()> {
    let provider = GitHubProvider::new(&config.api_url).context("Failed to create GitHub client")?;

    // Filter goes in before the load so a failed load keeps its fallback
    let (page, _session, outcome) =
        build_page(&provider, config, filter, chrono::Local::now().year()).await;

    match outcome {
        LoadOutcome::Loaded {
            featured, recent, ..
        } => tracing::info!("Loaded {} featured and {} recent repositories", featured, recent),
        // The fallback page is still a valid page, so keep going
        LoadOutcome::Fallback(err) => tracing::warn!("Writing fallback page: {}", err),
    }

    let html = page.to_html(&config.title(), &config.profile_url());
    match out {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

async fn list(config: &Config, json: bool) -> anyhow::Result<()> {
    let provider = GitHubProvider::new(&config.api_url).context("Failed to create GitHub client")?;
    let repos = provider
        .fetch_repositories(&config.github_username)
        .await
        .with_context(|| format!("Failed to load repositories for {}", config.github_username))?;

    let ranked = Ranked::from_fetched(repos, config.featured_count, config.max_repos_to_show);

    if json {
        let value = serde_json::json!({
            "featured": ranked.featured,
            "recent": ranked.recent,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_section("Featured", &ranked.featured);
    println!();
    print_section("Recent", &ranked.recent);
    Ok(())
}

fn print_section(title: &str, repos: &[Repository]) {
    println!("{} ({})", title, repos.len());
    for repo in repos {
        println!(
            "  {:<32} {:>6}★ {:>5} forks  {:<18} {}",
            repo.name,
            repo.stars,
            repo.forks,
            repo.language.as_deref().unwrap_or("—"),
            format_date(repo.updated_at.as_deref().unwrap_or_default()),
        );
    }
}
