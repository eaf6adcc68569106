//! cmdmenu developer CLI
//!
//! Drives the palette core outside the admin shell:
//! - Inspect the menu built from host descriptors and plugin config
//! - Run collection searches and remote actions against a live host
//! - Replay scripted palette sessions and print the update stream
//! - Register the palette with a host configuration file

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use cmdmenu_core::config::{Directories, PluginConfig, load_source};
use cmdmenu_core::dispatch::{Platform, SearchButton};
use cmdmenu_core::host::{
    Backend, HostConfig, HttpBackend, InvokeRequest, ListRequest, with_command_menu,
};
use cmdmenu_core::menu::{self, MenuFilter};
use cmdmenu_core::navigation::search_target;
use cmdmenu_core::subsearch::{PAGE_SIZE, document_item};
use cmdmenu_core::{HttpMethod, MenuAction, Palette, PaletteEvent, SourceConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command palette core for CMS admin panels
#[derive(Parser)]
#[command(name = "cmdmenu")]
#[command(version)]
#[command(after_help = "\
Examples:
  cmdmenu menu                          Print the menu for the default locale
  cmdmenu menu --locale uk --query pos  Print the filtered Ukrainian menu
  cmdmenu search posts hello            Search the posts collection
  cmdmenu invoke /api/rebuild -m POST   Fire a remote action
  cmdmenu replay session.jsonl          Replay palette events, print updates
  cmdmenu register payload.json         Register the palette with a host config
")]
struct Cli {
    /// Plugin config file (defaults to ~/.config/cmdmenu/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Host collection/global descriptors (defaults to ~/.config/cmdmenu/source.json)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Admin locale used to resolve labels
    #[arg(long, global = true, default_value = "en")]
    locale: String,

    /// Base URL of the host admin server
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved menu
    Menu {
        /// Main-page filter query
        #[arg(long, short)]
        query: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search documents of a collection
    Search {
        /// Collection slug
        slug: String,

        /// Text matched against the collection's title field
        query: Option<String>,
    },

    /// Fire a remote action
    Invoke {
        /// Endpoint path or URL
        href: String,

        #[arg(long, short, value_enum, default_value_t = MethodArg::Get)]
        method: MethodArg,

        /// JSON object sent as request body
        #[arg(long, short)]
        body: Option<String>,
    },

    /// Replay palette events (one JSON object per line) and print updates
    Replay {
        /// Event script, `-` for stdin
        script: PathBuf,

        /// Time allowed for pending searches after the last event
        #[arg(long, default_value_t = 1000)]
        settle_ms: u64,
    },

    /// Print a host config with the palette registered
    Register {
        /// Host config JSON file
        host_config: PathBuf,
    },

    /// Print the search button descriptor
    Button {
        #[arg(long, value_enum)]
        platform: Option<PlatformArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Get,
    Post,
    Put,
    Delete,
}

impl From<MethodArg> for HttpMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Get => Self::Get,
            MethodArg::Post => Self::Post,
            MethodArg::Put => Self::Put,
            MethodArg::Delete => Self::Delete,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Mac,
    Other,
}

impl From<PlatformArg> for Platform {
    fn from(platform: PlatformArg) -> Self {
        match platform {
            PlatformArg::Mac => Self::Mac,
            PlatformArg::Other => Self::Other,
        }
    }
}

fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cmdmenu={default_level}")));

    if cfg!(debug_assertions) {
        let temp_dir = std::env::temp_dir();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("cmdmenu-{timestamp}.log");

        let file_appender = tracing_appender::rolling::never(&temp_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .with(filter)
            .init();

        debug!("Logging to {}", temp_dir.join(&log_filename).display());
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let ctx = Ctx::from_cli(&cli)?;

    match cli.command {
        Commands::Menu { query, json } => run_menu(&ctx, query.as_deref(), json),
        Commands::Search { slug, query } => run_search(&ctx, &slug, query).await,
        Commands::Invoke { href, method, body } => {
            run_invoke(&ctx, href, method.into(), body.as_deref()).await
        }
        Commands::Replay { script, settle_ms } => run_replay(ctx, &script, settle_ms).await,
        Commands::Register { host_config } => run_register(&ctx, &host_config),
        Commands::Button { platform } => run_button(&ctx, platform.map(Into::into)),
    }
}

/// Inputs shared by every subcommand
struct Ctx {
    config: PluginConfig,
    source: SourceConfig,
    locale: String,
    base_url: String,
}

impl Ctx {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let dirs = Directories::new().ok();

        let config_path = cli
            .config
            .clone()
            .or_else(|| dirs.as_ref().map(|d| d.config_file.clone()));
        let config = match &config_path {
            Some(path) => PluginConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => PluginConfig::default(),
        };

        let source_path = cli
            .source
            .clone()
            .or_else(|| dirs.as_ref().map(|d| d.source_file.clone()));
        let source = match &source_path {
            Some(path) if path.exists() => load_source(path)
                .with_context(|| format!("Failed to load source from {}", path.display()))?,
            Some(path) if cli.source.is_some() => {
                bail!("Source file {} does not exist", path.display())
            }
            _ => SourceConfig::default(),
        };

        debug!(
            "Loaded {} collections, {} globals",
            source.collections.len(),
            source.globals.len()
        );

        Ok(Self {
            config,
            source,
            locale: cli.locale.clone(),
            base_url: cli.base_url.clone(),
        })
    }

    fn backend(&self) -> Result<HttpBackend> {
        HttpBackend::new(&self.base_url)
            .with_context(|| format!("Invalid base URL {}", self.base_url))
    }
}

fn run_menu(ctx: &Ctx, query: Option<&str>, json: bool) -> Result<()> {
    let built = menu::build(&ctx.source, &ctx.locale, &ctx.config);
    let shown = match query {
        Some(query) => MenuFilter::new().filter(&built, query),
        None => built,
    }
    .into_visible();

    if json {
        let value = serde_json::json!({
            "groups": shown.groups,
            "items": shown.items,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("(no entries)");
        return Ok(());
    }

    for group in &shown.groups {
        println!("{}", group.title);
        for item in &group.items {
            println!("  {:<24} {:<28} {}", item.slug, item.label, describe(&item.action));
        }
    }
    if !shown.items.is_empty() {
        println!();
        for item in &shown.items {
            println!("{:<26} {:<28} {}", item.slug, item.label, describe(&item.action));
        }
    }
    Ok(())
}

fn describe(action: &MenuAction) -> String {
    match action {
        MenuAction::Navigate { path } => format!("-> {path}"),
        MenuAction::Invoke {
            endpoint, method, ..
        } => format!("{method} {endpoint}"),
    }
}

async fn run_search(ctx: &Ctx, slug: &str, query: Option<String>) -> Result<()> {
    let built = menu::build(&ctx.source, &ctx.locale, &ctx.config);
    let Some(item) = built.entries().find(|i| i.slug == slug && i.is_collection()) else {
        bail!("'{slug}' is not a searchable collection");
    };

    let target = search_target(item)?;

    let backend = ctx.backend()?;
    let docs = backend
        .list_documents(ListRequest {
            slug: target.slug.clone(),
            title_field: target.title_field.clone(),
            filter: query.filter(|q| !q.trim().is_empty()),
            limit: PAGE_SIZE,
        })
        .await
        .with_context(|| format!("Failed to search {slug}"))?;

    info!("{} documents in {}", docs.len(), target.label);
    for doc in &docs {
        let item = document_item(&target, doc, None);
        println!("{:<28} {}", item.label, describe(&item.action));
    }
    Ok(())
}

async fn run_invoke(ctx: &Ctx, href: String, method: HttpMethod, body: Option<&str>) -> Result<()> {
    let body = match body {
        Some(raw) => Some(serde_json::from_str(raw).context("Body must be a JSON object")?),
        None => None,
    };

    ctx.backend()?
        .invoke(InvokeRequest {
            endpoint: href.clone(),
            method,
            body,
        })
        .await
        .with_context(|| format!("{method} {href} failed"))?;

    println!("{method} {href}: ok");
    Ok(())
}

async fn run_replay(ctx: Ctx, script: &Path, settle_ms: u64) -> Result<()> {
    let content = if script == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(script)
            .with_context(|| format!("Failed to read {}", script.display()))?
    };

    let events = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|(n, line)| {
            serde_json::from_str::<PaletteEvent>(line)
                .with_context(|| format!("Invalid event on line {}", n + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let backend = Arc::new(ctx.backend()?);
    let (mut palette, mut updates) = Palette::new(backend, ctx.source, ctx.config, &ctx.locale);
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

    let printer = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            match serde_json::to_string(&update) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("Failed to serialize update: {e}"),
            }
        }
    });

    tokio::spawn(async move {
        for event in events {
            if event_tx.send(event).is_err() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(settle_ms)).await;
    });

    palette.run(event_rx).await;
    drop(palette);
    printer.await.context("Update printer panicked")?;
    Ok(())
}

fn run_register(ctx: &Ctx, host_config: &Path) -> Result<()> {
    let content = std::fs::read_to_string(host_config)
        .with_context(|| format!("Failed to read {}", host_config.display()))?;
    let config: HostConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid host config {}", host_config.display()))?;

    let augmented = with_command_menu(config, &ctx.config)?;
    println!("{}", serde_json::to_string_pretty(&augmented)?);
    Ok(())
}

fn run_button(ctx: &Ctx, platform: Option<Platform>) -> Result<()> {
    let platform = platform.unwrap_or_else(Platform::current);
    match SearchButton::from_config(&ctx.config, platform) {
        Some(button) => println!("{}", serde_json::to_string_pretty(&button)?),
        None => println!("Search button not configured"),
    }
    Ok(())
}
