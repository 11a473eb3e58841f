mod api;
mod app;
mod cli;
mod event;
mod feed;
mod help;
mod keys;
mod layout;
mod logging;
mod pagination;
mod scroll;
mod settings;
mod time;
mod tui;
mod viewport;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use ratatui::Frame;
use tracing::{info, warn};

use api::{ArticleSource, DEFAULT_BASE_URL, FETCH_ARTICLES_ERROR, NewsClient};
use app::{App, AppConfig, Message};
use cli::{Cli, Commands, OutputFormat};
use event::Event;
use settings::{DEFAULT_CELL_WIDTH, DEFAULT_QUERY, Settings};
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = settings::config_dir(cli.config_dir.as_ref());

    if let Some(Commands::Config { init }) = &cli.command {
        return handle_config_command(*init, config_dir.as_ref());
    }

    let (settings, settings_error) = load_settings(config_dir.as_ref());
    let _log_guard = match &config_dir {
        Some(dir) => match logging::init(dir, cli.verbose) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Logging disabled: {e:#}");
                None
            }
        },
        None => None,
    };
    if let Some(e) = settings_error {
        warn!("Using default settings: {e:#}");
    }

    match &cli.command {
        Some(Commands::Page { page, format }) => print_page(&cli, &settings, *page, *format).await,
        _ => run_tui(&cli, &settings).await,
    }
}

/// Settings from `<config_dir>/settings.toml`, or defaults plus the reason they were not loaded.
fn load_settings(config_dir: Option<&PathBuf>) -> (Settings, Option<anyhow::Error>) {
    let Some(dir) = config_dir else {
        return (Settings::default(), None);
    };
    match Settings::load(&settings::settings_path(dir)) {
        Ok(settings) => (settings, None),
        Err(e) => {
            eprintln!("Warning: {e:#}");
            (Settings::default(), Some(e))
        }
    }
}

fn handle_config_command(init: bool, config_dir: Option<&PathBuf>) -> Result<()> {
    let dir = config_dir.context("Could not determine config directory")?;
    let path = settings::settings_path(dir);

    if init {
        if path.exists() {
            println!("Settings already exist at {}", path.display());
        } else {
            Settings::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    println!("{}", path.display());
    let settings = Settings::load(&path)?;
    let content = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
    print!("{content}");
    Ok(())
}

// Priority for every option: CLI flag > settings file > default

fn resolve_query(cli: &Cli, settings: &Settings) -> String {
    cli.query
        .clone()
        .or_else(|| settings.query.clone())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string())
}

fn build_client(cli: &Cli, settings: &Settings) -> NewsClient {
    let base_url = cli
        .base_url
        .as_deref()
        .or(settings.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL);
    let session = cli.session.clone().or_else(|| settings.session.clone());
    NewsClient::new(base_url).with_session(session)
}

fn app_config(cli: &Cli, settings: &Settings) -> AppConfig {
    AppConfig {
        query: resolve_query(cli, settings),
        scroll_threshold: settings.scroll_threshold.unwrap_or(scroll::DEFAULT_THRESHOLD),
        breakpoints: settings.breakpoints,
    }
}

async fn print_page(cli: &Cli, settings: &Settings, page: u32, format: OutputFormat) -> Result<()> {
    let client = build_client(cli, settings);
    let query = resolve_query(cli, settings);

    let articles = client
        .try_fetch_page(&query, page)
        .await
        .map_err(|e| anyhow!("{FETCH_ARTICLES_ERROR} ({}): {e}", e.kind()))?;
    info!(query = %query, page, count = articles.len(), "page fetched");

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&articles)
                .context("Failed to serialize articles to JSON")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if articles.is_empty() {
                println!("No articles on page {page} for '{query}'");
            }
            for article in &articles {
                println!("{}", article.headline_text());
                let snippet = article.snippet_text();
                if !snippet.is_empty() {
                    println!("  {snippet}");
                }
                if let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) {
                    println!("  {url}");
                }
                println!();
            }
        }
    }
    Ok(())
}

async fn run_tui(cli: &Cli, settings: &Settings) -> Result<()> {
    let config = app_config(cli, settings);
    let client = build_client(cli, settings);
    let source: Arc<dyn ArticleSource> = Arc::new(client.clone());
    let cell_width = settings.cell_width.unwrap_or(DEFAULT_CELL_WIDTH);

    info!(query = %config.query, base_url = client.base_url(), "starting");

    let mut terminal = tui::init()?;
    let mut app = App::new(config, client, source, time::system_clock());
    let mut events = EventHandler::new(250);

    app.mount();
    let size = terminal.size()?;
    app.update(Message::Resize {
        width: tui::pixel_width(size.width, cell_width),
        height: size.height,
    });
    app.load_session();

    let result = async {
        loop {
            app.poll_results();
            terminal.draw(|frame| render(&app, frame))?;

            if app.should_quit {
                break;
            }

            match events.next().await? {
                Event::Key(key) => {
                    if let Some(msg) = keys::handle_key(key, &app) {
                        app.update(msg);
                    }
                }
                Event::Resize(columns, rows) => app.update(Message::Resize {
                    width: tui::pixel_width(columns, cell_width),
                    height: rows,
                }),
                Event::ScrollDown => app.update(Message::SelectNext),
                Event::ScrollUp => app.update(Message::SelectPrev),
                Event::Tick => {}
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    app.teardown();
    tui::restore()?;
    result
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    let (main_area, debug_area) = if app.show_debug {
        let chunks = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(App::DEBUG_PANE_HEIGHT),
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    views::articles::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::help::render(frame, app, area);
}
