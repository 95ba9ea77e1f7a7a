mod config;
mod dashboard;
mod logging;
mod product;
mod source;
mod store;
mod ui;

use clap::{Parser, Subcommand};
use config::DashboardConfig;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dashboard::{Dashboard, DashboardView, InputMode, PAGE_SIZE};
use source::{FileSource, HttpSource, ProductSource};
use std::path::PathBuf;
use std::sync::Arc;
use store::{ProductStore, Store, StoreEvent};

/// TUI dashboard for browsing, searching and paging a product catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the products API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read products from a JSON file instead of the API
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive dashboard (default)
    Run,
    /// Fetch once and print one page of products as plain text
    List {
        /// Search term matched against title and description
        #[arg(short, long, default_value = "")]
        search: String,
        /// Page to print (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(file) = &self.file {
            config.product_file = Some(file.clone());
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

fn build_source(config: &DashboardConfig) -> Result<Arc<dyn ProductSource>, Box<dyn std::error::Error>> {
    Ok(match &config.product_file {
        Some(path) => Arc::new(FileSource::new(path.clone())),
        None => Arc::new(HttpSource::new(&config.api_url, config.request_timeout())?),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let store = ProductStore::new(build_source(&config)?);
    tracing::info!(source = %store.describe_source(), "starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List { search, page } => {
            print_page(store, &search, page)?;
        }
        Commands::Run => {
            let mut app = Dashboard::new(store);

            // Init terminal
            let mut terminal = ratatui::init();
            let size = terminal.size()?;
            app.update_card_area(size.width, size.height);
            app.mount();

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            ratatui::restore();

            // `_log_guard` must drop to flush the log file, so no process::exit here.
            if let Err(e) = result {
                tracing::error!(error = %e, "dashboard exited with error");
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Headless variant: fetch, wait for the store to settle, print the page.
fn print_page(store: ProductStore, search: &str, page: usize) -> Result<(), Box<dyn std::error::Error>> {
    let events = store.subscribe();
    store.fetch_products();

    let mut state = store.state();
    while state.loading {
        match events.recv() {
            Ok(StoreEvent::StateChanged(next)) => state = next,
            Err(_) => break,
        }
    }
    if let Some(error) = store::select_error(&state) {
        return Err(error.into());
    }

    let view = DashboardView::derive(&state, search, page);
    if view.show_no_results() {
        println!("No products found.");
    }
    for line in ui::card::plain_text(&ui::card::render_cards(view.page_items(), 80)) {
        println!("{}", line);
    }
    println!();
    println!(
        "{}   ({} of {} products, {} per page)",
        ui::pagination::summary(&ui::pagination::controls(&view)),
        view.filtered.len(),
        view.total,
        PAGE_SIZE
    );
    Ok(())
}

async fn run_app<S: Store>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut Dashboard<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.sync_store();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(width, height) => {
                    app.update_card_area(width, height);
                }
                _ => {}
            }
        }
    }
}

fn handle_key<S: Store>(app: &mut Dashboard<S>, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.input_mode {
        InputMode::Searching => handle_search_input(app, key),
        InputMode::PageJump { .. } => handle_page_jump_input(app, key),
        InputMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_search_input<S: Store>(app: &mut Dashboard<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.pop_search_char();
        }
        KeyCode::Char(c) => {
            app.push_search_char(c);
        }
        _ => {}
    }
}

fn handle_page_jump_input<S: Store>(app: &mut Dashboard<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_page_jump(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_page_digit(),
        KeyCode::Char(c) => app.push_page_digit(c),
        _ => {}
    }
}

fn handle_normal_key<S: Store>(app: &mut Dashboard<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Searching;
        }
        KeyCode::Char(':') => {
            app.begin_page_jump();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.prev_page();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.next_page();
        }
        KeyCode::Char(c @ '1'..='9') => {
            let page = c as usize - '0' as usize;
            if !app.go_to_page(page) {
                app.status_msg = format!("No page {}", page);
            }
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.first_page();
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.last_page();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
        }
        KeyCode::PageDown => {
            app.scroll_page_down();
        }
        KeyCode::PageUp => {
            app.scroll_page_up();
        }
        KeyCode::Esc => {
            // Clear search
            if !app.search_term.is_empty() {
                app.clear_search();
            }
        }
        _ => {}
    }
}
