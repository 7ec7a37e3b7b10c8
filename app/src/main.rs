//! Command line entry point for MediaLens.

use api_client::ApiClient;
use clap::{Parser, Subcommand};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::rolling;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;
use ui::{render, AppFlags, MediaApp, Message};
use viewer::{MediaListRegistry, ViewerLauncher};

mod config;
mod repl;

#[derive(Parser)]
#[command(
    name = "medialens",
    author,
    version,
    about = "MediaLens semantic media search and viewer"
)]
struct Cli {
    /// Override log level (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
    /// Override the backend API base URL
    #[arg(long)]
    api_url: Option<String>,
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the initial media of the library
    Browse {
        /// Maximum number of items to display
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search the library with a natural language query
    Search {
        query: String,
        /// Maximum number of results
        #[arg(long)]
        top_k: Option<usize>,
        /// Send the query as typed
        #[arg(long)]
        no_expansion: bool,
    },
    /// Upload images or videos to the backend
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Index the backend media folder
    Analyse,
    /// Show backend status
    Health,
    /// Interactive browser with the full-screen viewer
    View {
        /// Start on the search tab with this query
        #[arg(long)]
        query: Option<String>,
    },
}

#[cfg_attr(feature = "trace-spans", tracing::instrument)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut overrides = config::AppConfigOverrides {
        log_level: cli.log_level.clone(),
        api_url: cli.api_url.clone(),
        ..config::AppConfigOverrides::default()
    };
    match &cli.command {
        Commands::Browse { limit } => overrides.initial_limit = *limit,
        Commands::Search {
            top_k,
            no_expansion,
            ..
        } => {
            overrides.search_top_k = *top_k;
            overrides.no_query_expansion = *no_expansion;
        }
        _ => {}
    }
    let cfg = config::AppConfig::load_from(cli.config.clone()).apply_overrides(&overrides);

    std::fs::create_dir_all(&cfg.data_dir)?;
    let file_appender = rolling::daily(&cfg.data_dir, "medialens.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cfg.log_level.clone()))
        .with_writer(std::io::stderr.and(file_writer))
        .init();

    let client = ApiClient::new(cfg.api_url.clone());
    tracing::info!("Using backend {}", client.base_url());

    match cli.command {
        Commands::Browse { .. } => {
            let items = client.fetch_initial_media(cfg.initial_limit).await;
            if items.is_empty() {
                println!("No media found");
            } else {
                println!("{}", render::grid(&items));
            }
        }
        Commands::Search { query, .. } => {
            let results = client.search_media(&query, &cfg.search_options()).await;
            if results.is_empty() {
                println!("No results found for {:?}", query);
            } else {
                println!("{} result(s) for {:?}", results.len(), query);
                println!("{}", render::grid(&results));
            }
        }
        Commands::Upload { files } => {
            let summary = client.upload_media(&files).await?;
            println!("Uploaded {} file(s)", summary.uploaded);
            for name in &summary.files {
                println!("  {}", name);
            }
            for err in summary.errors.unwrap_or_default() {
                println!("Skipped: {}", err);
            }
        }
        Commands::Analyse => {
            let status = client.analyse().await?;
            println!("{}", status.message.unwrap_or(status.status));
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("Status: {}", health.status);
            println!("Index loaded: {}", health.index_loaded);
            println!("Media count: {}", health.media_count);
        }
        Commands::View { query } => run_view(&cfg, client, query).await?,
    }

    Ok(())
}

/// Drive a `MediaApp` from stdin until `quit` or end of input.
async fn run_view(
    cfg: &config::AppConfig,
    client: ApiClient,
    query: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (launcher, mut hide_events) =
        ViewerLauncher::new(MediaListRegistry::new(), cfg.viewer_config());
    let flags = AppFlags {
        initial_limit: cfg.initial_limit,
        search_options: cfg.search_options(),
        dark_mode: cfg.dark_mode,
        ..AppFlags::new(client, launcher)
    };
    let (mut app, startup) = MediaApp::new(flags);

    let mut pending: FuturesUnordered<BoxFuture<'static, Message>> =
        startup.into_futures().into_iter().collect();
    if let Some(q) = query {
        pending.extend(app.update(Message::SearchSubmitted(q)).into_futures());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render::render(&app));

    loop {
        tokio::select! {
            Some(msg) = pending.next(), if !pending.is_empty() => {
                pending.extend(app.update(msg).into_futures());
            }
            Some(event) = hide_events.recv() => {
                let _ = app.update(Message::HideElapsed(event));
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match repl::parse(&line, &app) {
                    Ok(repl::Input::Quit) => break,
                    Ok(repl::Input::Help) => {
                        println!("{}", repl::HELP);
                        continue;
                    }
                    Ok(repl::Input::Send(messages)) => {
                        let before = app.last_action().cloned();
                        for msg in messages {
                            pending.extend(app.update(msg).into_futures());
                        }
                        if let Some(request) = app.last_action().filter(|r| Some(*r) != before.as_ref()) {
                            println!("{}: {} ({})", request.action, request.target, request.title);
                        }
                    }
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                }
            }
        }
        println!("{}", render::render(&app));
    }

    if let Some(session) = app.viewer() {
        tracing::debug!("Leaving with viewer {} open", session.id());
    }
    Ok(())
}
