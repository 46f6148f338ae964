use clap::Parser;
use issuescout_core::{
    detail::{fetch_issue_detail, IssueDetail},
    directory,
    models::{Issue, Repository},
    pipeline::{fetch_page, Pagination},
    repo_ref::{RepoRef, Route},
    view::{derive_view, FilterState, SortDirection, SortField, SortState, StateFilter},
    Config, GitHubProvider, IssueSource,
};
use issuescout_tui::App;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "issuescout")]
#[command(version, about = "Browse GitHub repositories and their issues from the terminal", long_about = None)]
struct Cli {
    /// GitHub token, overrides the config file
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// API base URL (for GitHub Enterprise)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Launch the interactive browser
    Tui {
        /// Where to start: owner/repo, owner/repo/issues/N or owner/repo#N
        target: Option<String>,
    },
    /// List one page of a repository's issues
    Issues {
        /// Repository name (owner/repo)
        repo: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Issues per page, 1-100 (defaults to the config value)
        #[arg(long)]
        per_page: Option<u32>,
        #[arg(long, default_value_t = StateFilter::All)]
        state: StateFilter,
        /// Keep issues carrying any of these labels
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Substring of the assignee's login
        #[arg(long)]
        assignee: Option<String>,
        /// Substring of the title or author
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = SortField::Created)]
        sort: SortField,
        #[arg(long, default_value_t = SortDirection::Desc)]
        direction: SortDirection,
        #[arg(long)]
        json: bool,
    },
    /// Show an issue with its comments
    Show {
        /// Repository name (owner/repo)
        repo: String,
        number: u64,
        #[arg(long)]
        json: bool,
    },
    /// Show repository details
    Repo {
        /// Repository name (owner/repo)
        repo: String,
        #[arg(long)]
        json: bool,
    },
    /// List featured repositories
    Featured {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, None | Some(Commands::Tui { .. })));

    let config = Config::load()?.with_overrides(cli.token, cli.api_url);
    let provider = GitHubProvider::new(config.github.token.clone(), &config.github.api_url)?;
    if !provider.is_authenticated() {
        tracing::info!("No GitHub token configured, using unauthenticated requests");
    }

    match cli.command {
        None => launch_tui(&config, provider, None).await,
        Some(Commands::Tui { target }) => launch_tui(&config, provider, target).await,
        Some(Commands::Issues {
            repo,
            page,
            per_page,
            state,
            labels,
            assignee,
            keyword,
            sort,
            direction,
            json,
        }) => {
            let per_page = per_page.unwrap_or_else(|| config.per_page());
            tracing::info!("Listing issues for {} (page {})", repo, page);
            let loaded = fetch_page(&provider, &repo, page, per_page).await?;

            let filters = FilterState {
                state,
                labels: labels.into_iter().collect(),
                assignee: assignee.unwrap_or_default(),
                keyword: keyword.unwrap_or_default(),
            };
            let sort = SortState {
                field: sort,
                direction,
            };
            let view = derive_view(&loaded.issues, &filters, &sort);

            if json {
                let output = serde_json::json!({
                    "issues": view,
                    "pagination": loaded.pagination,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_issues(&view, loaded.issues.len(), &loaded.pagination);
            }
            Ok(())
        }
        Some(Commands::Show { repo, number, json }) => {
            let repo = RepoRef::parse(&repo)?;
            tracing::info!("Showing {}#{}", repo, number);
            let detail = fetch_issue_detail(&provider, &repo, number).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_detail(&detail);
            }
            Ok(())
        }
        Some(Commands::Repo { repo, json }) => {
            let repo = RepoRef::parse(&repo)?;
            tracing::info!("Showing repository: {}", repo);
            let repository = provider.get_repository(&repo).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&repository)?);
            } else {
                print_repository(&repository);
            }
            Ok(())
        }
        Some(Commands::Featured { query, language }) => {
            let hits = directory::search(directory::featured(), &query, language.as_deref());
            if hits.is_empty() {
                println!("No featured repository matches.");
            }
            for repo in hits {
                println!("{:<28} {:<12} {}", repo.full_name(), repo.language, repo.description);
            }
            Ok(())
        }
    }
}

fn init_logging(interactive: bool) {
    // Log lines would tear the TUI's alternate screen, so it stays quiet unless RUST_LOG asks
    let default_filter = if interactive { "off" } else { "issuescout=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn launch_tui(
    config: &Config,
    provider: GitHubProvider,
    target: Option<String>,
) -> anyhow::Result<()> {
    let route = Route::parse(target.as_deref().unwrap_or(""))?;
    let app = App::from_config(config);
    let source: Arc<dyn IssueSource> = Arc::new(provider);
    issuescout_tui::run_tui(app, source, route).await
}

fn print_issues(view: &[&Issue], loaded: usize, pagination: &Pagination) {
    if loaded == 0 {
        println!("No issues on this page.");
    }

    for issue in view {
        let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        println!(
            "#{:<6} {:<6} {}  {:>3} comments  {}{}",
            issue.number,
            issue.state,
            issue.created_at.format("%Y-%m-%d"),
            issue.comments,
            issue.title,
            if labels.is_empty() {
                String::new()
            } else {
                format!("  [{}]", labels.join(", "))
            }
        );
    }

    let total = pagination
        .total_pages
        .map(|total| total.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!();
    println!(
        "Page {} of {} ({} per page), {} of {} shown",
        pagination.page,
        total,
        pagination.per_page,
        view.len(),
        loaded
    );
}

fn print_detail(detail: &IssueDetail) {
    let issue = &detail.issue;
    println!("#{} {}", issue.number, issue.title);
    println!(
        "{} - opened {} by {}",
        issue.state,
        issue.created_at.format("%Y-%m-%d"),
        issue.author.login
    );
    if let Some(assignee) = issue.assignee_login() {
        println!("Assignee: {}", assignee);
    }
    if !issue.labels.is_empty() {
        let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        println!("Labels: {}", labels.join(", "));
    }
    println!("{}", issue.html_url);
    println!();
    println!("{}", issue.body.as_deref().unwrap_or("No description provided."));

    if let Some(err) = &detail.comments_error {
        println!();
        println!("Comments could not be loaded: {}", err);
    }
    for comment in &detail.comments {
        println!();
        println!(
            "--- {} on {}",
            comment.author.login,
            comment.created_at.format("%Y-%m-%d %H:%M")
        );
        println!("{}", comment.body);
    }
}

fn print_repository(repository: &Repository) {
    println!("{}", repository.full_name);
    if let Some(description) = &repository.description {
        println!("{}", description);
    }
    println!(
        "Language: {}",
        repository.language.as_deref().unwrap_or("unknown")
    );
    println!(
        "Stars: {}  Forks: {}  Open issues and PRs: {}",
        repository.stars, repository.forks, repository.open_issues
    );
    println!("{}", repository.url);
}
