mod app;
mod campaign;
mod config;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, KeyOutcome};
use campaign::format_amount;
use config::AppConfig;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "thermo")]
#[command(version = "0.1.0")]
#[command(about = "A terminal fundraiser thermometer")]
struct Args {
    /// Heading shown above the thermometer
    #[arg(long)]
    title: Option<String>,

    /// Line shown under the heading
    #[arg(long)]
    tagline: Option<String>,

    /// Config file to use instead of ~/.config/thermo/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the final totals as JSON after exiting
    #[arg(short, long)]
    summary: bool,
}

fn main() -> Result<()> {
    // Stderr only, so nothing lands on the TUI unless RUST_LOG asks for it
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())
        .unwrap_or_default()
        .with_overrides(args.title, args.tagline);

    ui::init_theme(Theme::load(config.theme_file.as_deref()));

    let mut app = App::new(config.title.clone(), config.tagline.clone());
    run_tui(&mut app, &config)?;

    if args.summary {
        print_summary(&app)?;
    }
    Ok(())
}

fn run_tui(app: &mut App, config: &AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, app, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &AppConfig,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Nothing changes between key presses, so block until the next one
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                KeyOutcome::Quit => return Ok(()),
                KeyOutcome::TargetCrossed if config.notifications => {
                    let body = format!(
                        "{} reached its target of ${}",
                        app.title,
                        format_amount(app.campaign.target())
                    );
                    if let Err(e) = notify("Target reached!", &body) {
                        tracing::warn!("Notification failed: {}", e);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Final totals for scripts, e.g. `thermo --summary | jq .raised`
fn print_summary(app: &App) -> Result<()> {
    let campaign = &app.campaign;
    let output = serde_json::json!({
        "title": app.title,
        "raised": campaign.raised(),
        "target": campaign.target(),
        "percent": campaign.percent(),
        "complete": campaign.is_complete(),
        "text": format!(
            "${} / ${}",
            format_amount(campaign.raised()),
            format_amount(campaign.target())
        ),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("emblem-favorite")
        .show()?;
    Ok(())
}
