mod api;
mod app;
mod config;
mod error;
mod image;
mod model;
mod ui;

use api::RecipeClient;
use app::{App, DispatchCompletion, DispatchRequest, Focus, View};
use clap::{Parser, Subcommand};
use config::Config;
use error::{LookupError, UNEXPECTED_ERROR};
use image::SelectedImage;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "dish-explorer.log";

/// Look up recipes and calorie estimates by dish name or photo
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base address of the recipe service (overrides the config file)
    #[arg(short = 'u', long, global = true)]
    base_url: Option<String>,

    /// Path to a config.json (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI (default)
    Run,
    /// Look up a single dish and print the recipes
    Lookup {
        /// Dish name to search for
        #[arg(short, long)]
        dish: Option<String>,
        /// Photo of the dish; takes precedence over --dish
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    init_logging(matches!(command, Commands::Run))?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url);
    }
    tracing::info!("Using recipe service at {}", config.base_url);

    let client = RecipeClient::new(&config)?;

    match command {
        Commands::Lookup { dish, image } => match lookup(&client, dish, image).await {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(e.exit_code());
            }
        },
        Commands::Run => {
            let mut app = App::new(client.base_url(), config.reveal_delay());

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app, &client).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!("TUI exited with error: {}", e);
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// One dispatch without the TUI; returns the cards as plain text.
async fn lookup(
    client: &RecipeClient,
    dish: Option<String>,
    image: Option<PathBuf>,
) -> Result<String, LookupError> {
    let mut app = App::new(client.base_url(), Duration::ZERO);
    app.enter_form();
    app.dish_name = dish.unwrap_or_default();
    if let Some(path) = image {
        app.selected_image = Some(SelectedImage::load(&path.to_string_lossy())?);
    }

    let request = app.begin_dispatch().ok_or(LookupError::InputRequired)?;
    let outcome = client.fetch(&request.lookup).await;
    app.finish_dispatch(
        DispatchCompletion {
            generation: request.generation,
            outcome,
        },
        Instant::now(),
    );

    match (app.result, app.error) {
        (Some(result), _) => Ok(ui::results::plain_text(&result)),
        (None, Some(error)) => Err(LookupError::Fetch(error)),
        (None, None) => Err(LookupError::Fetch(UNEXPECTED_ERROR.to_string())),
    }
}

/// The TUI owns the terminal, so interactive runs log to a file in the cache
/// directory; `lookup` logs to stderr.
fn init_logging(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "dish_explorer=info".into());

    if interactive {
        let cache_dir = config::project_dirs()?.cache_dir().to_path_buf();
        std::fs::create_dir_all(&cache_dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(cache_dir.join(LOG_FILE))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    client: &RecipeClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let (completion_tx, mut completion_rx) = unbounded_channel();

    loop {
        while let Ok(completion) = completion_rx.try_recv() {
            app.finish_dispatch(completion, Instant::now());
        }
        app.tick(Instant::now());

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so completions and the reveal delay are picked up promptly
        if crossterm::event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(request) = handle_key(app, key) {
                    spawn_dispatch(client, request, completion_tx.clone());
                }
            }
        }
    }
}

/// Run one request in the background; the result comes back through the channel.
fn spawn_dispatch(
    client: &RecipeClient,
    request: DispatchRequest,
    completion_tx: UnboundedSender<DispatchCompletion>,
) {
    let client = client.clone();
    tokio::spawn(async move {
        let outcome = client.fetch(&request.lookup).await;
        let completion = DispatchCompletion {
            generation: request.generation,
            outcome,
        };
        if completion_tx.send(completion).is_err() {
            tracing::debug!("Event loop gone, dropping completion {}", request.generation);
        }
    });
}

/// Apply a key press; returns a request when the key triggered a dispatch.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<DispatchRequest> {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    // Overlays swallow the next key
    if app.prompt.is_some() {
        app.prompt = None;
        return None;
    }
    if app.show_help {
        app.show_help = false;
        return None;
    }

    if key.code == KeyCode::F(1) {
        app.show_help = true;
        return None;
    }

    match app.view {
        View::Landing => {
            handle_landing_key(app, key);
            None
        }
        View::Form => handle_form_key(app, key),
    }
}

fn handle_landing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.enter_form(),
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) -> Option<DispatchRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('r') if ctrl => return app.begin_dispatch(),
        KeyCode::Char('x') if ctrl => {
            app.detach_image();
            return None;
        }
        KeyCode::Tab => {
            app.focus_next();
            return None;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return None;
        }
        _ => {}
    }

    match app.focus {
        Focus::DishName if key.code == KeyCode::Enter => app.begin_dispatch(),
        Focus::ImagePath if key.code == KeyCode::Enter => {
            app.attach_image();
            None
        }
        Focus::DishName | Focus::ImagePath => {
            handle_field_input(app, key);
            None
        }
        Focus::Results => {
            handle_results_key(app, key);
            None
        }
    }
}

fn handle_field_input(app: &mut App, key: KeyEvent) {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return;
    }
    let Some(field) = app.focused_field_mut() else {
        return;
    };
    match key.code {
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Char(c) => {
            field.push(c);
        }
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.focus = Focus::DishName,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::PageDown => app.scroll_page_down(),
        KeyCode::PageUp => app.scroll_page_up(),
        _ => {}
    }
}
