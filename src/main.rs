mod app;
mod braille;
mod config;
mod controller;
mod error;
mod particle;
mod renderer;
mod resize;
mod scheduler;
mod settings;
mod stepper;
mod surface;
mod ui;

use app::{App, Focus};
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Linked particle field animation in the terminal")]
struct Args {
    // === Field Parameters ===
    /// Particle density, 100 = one particle per 10000 px² (0-1000)
    #[arg(short = 'd', long)]
    density: Option<f32>,

    /// Maximum per-axis drift per frame in px (0-10)
    #[arg(short = 's', long)]
    speed: Option<f32>,

    /// Distance in px under which particles are linked (0-1000)
    #[arg(short = 'l', long = "link-distance")]
    link_distance: Option<f32>,

    /// Opacity of links and canvas (0.0-1.0)
    #[arg(short = 'o', long)]
    opacity: Option<f32>,

    // === Host Options ===
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Seed for the random generator, for reproducible fields
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second (10-240)
    #[arg(long)]
    fps: Option<u32>,

    /// Surface pixels per Braille dot (1-16)
    #[arg(long = "pixel-scale")]
    pixel_scale: Option<f32>,

    /// Write log records to this file (RUST_LOG sets the filter)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Command-line values win over the config file
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(density) = self.density {
            config.field.density = density;
        }
        if let Some(speed) = self.speed {
            config.field.speed = speed;
        }
        if let Some(distance) = self.link_distance {
            config.field.max_link_distance = distance;
        }
        if let Some(opacity) = self.opacity {
            config.field.global_opacity = opacity;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(scale) = self.pixel_scale {
            config.pixel_scale = scale;
        }
        config.clamped()
    }
}

/// Logging goes to a file or nowhere; stderr would tear the alternate screen
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    builder.init();
    Ok(())
}

fn canvas_size<B: ratatui::backend::Backend>(
    terminal: &Terminal<B>,
    fullscreen: bool,
) -> io::Result<(u16, u16)> {
    let size = terminal.size()?;
    Ok(ui::get_canvas_size(
        Rect {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        },
        fullscreen,
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config_path = args.config.clone().or_else(AppConfig::default_path);
    let file_config = match &config_path {
        Some(path) => AppConfig::load_or_default(path),
        None => AppConfig::default(),
    };
    let config = args.apply(file_config);
    log::info!("starting with {:?}", config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, config_path, args.seed);

    // Run the app
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Mount the field on the initial canvas
    let (canvas_width, canvas_height) = canvas_size(terminal, app.fullscreen_mode)?;
    app.resize(canvas_width, canvas_height);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wait for input until the next frame is due
        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    app.status_message = None;

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reseed(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let (w, h) = canvas_size(terminal, app.fullscreen_mode)?;
                            app.resize(w, h);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Char('w') | KeyCode::Char('W') => app.save_config(),

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(term_size.height);
                                    app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) = ui::get_canvas_size(
                        Rect {
                            x: 0,
                            y: 0,
                            width,
                            height,
                        },
                        app.fullscreen_mode,
                    );
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        // Run due frames
        app.tick(Instant::now());
    }
}
