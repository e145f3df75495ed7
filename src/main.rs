use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use crossterm::terminal::ClearType;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use gridlife::camera::Camera;
use gridlife::config::GridSize;
use gridlife::config::Origin;
use gridlife::events;
use gridlife::events::AppEvent;
use gridlife::events::CameraEvent;
use gridlife::events::EngineEvent;
use gridlife::events::Event;
use gridlife::grid::Grid;
use gridlife::pattern::PatternFormat;
use gridlife::pattern::load_pattern;
use gridlife::perf::PerfCounter;

/// How often frame times are logged and reset
const PERF_RESET: Duration = Duration::from_secs(5);

/// Conway's Game of Life on a fixed-size grid.
#[derive(Parser)]
#[command(name = "gridlife", about = "Conway's Game of Life on a fixed-size grid")]
struct Args {
    /// Grid size in cells, as "<width>x<height>".
    #[arg(long, default_value_t = GridSize::default())]
    grid_size: GridSize,

    /// Pattern file to load before starting.
    #[arg(long)]
    pattern: Option<PathBuf>,

    /// Pattern format, guessed from the file extension if not given.
    #[arg(long)]
    format: Option<PatternFormat>,

    /// Where the pattern's top-left cell goes, as "<x>,<y>".
    #[arg(long, default_value_t = Origin::default(), allow_hyphen_values = true)]
    origin: Origin,

    /// Print generations to stdout instead of opening the terminal view.
    #[arg(long)]
    console_renderer: bool,

    /// Number of generations to print with --console-renderer.
    #[arg(long, default_value_t = 1)]
    generations: u64,

    /// Generations per second in the terminal view.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    info!("Launching Game of Life...");

    let mut grid = args
        .grid_size
        .grid()
        .with_context(|| format!("Failed to create a {} grid", args.grid_size))?;

    if let Some(path) = &args.pattern {
        load_pattern(&mut grid, path, args.format, args.origin).with_context(|| {
            format!(
                "Failed to load {} at {} into a {} grid",
                path.display(),
                args.origin,
                args.grid_size
            )
        })?;
    }

    if args.console_renderer {
        run_console(&mut grid, args.generations)
    } else {
        run_terminal(&mut grid, args.fps)
    }
}

/// Print the starting grid, then every following generation.
fn run_console(grid: &mut Grid, generations: u64) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    print_generation(&mut stdout, grid)?;

    for _ in 0..generations {
        grid.step();
        print_generation(&mut stdout, grid)?;
    }

    Ok(())
}

fn print_generation(out: &mut impl Write, grid: &Grid) -> io::Result<()> {
    writeln!(
        out,
        "generation {}, population {}",
        grid.generation(),
        grid.population()
    )?;
    writeln!(out, "{grid}")
}

/// Holds the terminal in raw mode on the alternate screen, restoring it when dropped.
struct RawTerminal;

impl RawTerminal {
    fn enter(stdout: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        // From here on, dropping the guard undoes raw mode even if the rest fails
        let guard = Self;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(guard)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen) {
            warn!("Failed to leave the alternate screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to disable raw mode: {e}");
        }
    }
}

fn run_terminal(grid: &mut Grid, fps: u32) -> anyhow::Result<()> {
    let mut stdout = io::stdout();

    let _terminal = RawTerminal::enter(&mut stdout)?;

    event_loop(grid, fps, &mut stdout)
}

fn event_loop(grid: &mut Grid, fps: u32, stdout: &mut impl Write) -> anyhow::Result<()> {
    let frametime = Duration::from_secs(1) / fps;

    // Last row is the status line
    let (cols, rows) = terminal::size()?;
    let mut cam = Camera::new(cols, rows.saturating_sub(1));

    let mut paused = false;
    let mut perf = PerfCounter::new();
    let mut last_tick = Instant::now();
    let mut last_dump = Instant::now();

    draw(stdout, &mut cam, grid, paused)?;

    loop {
        let timeout = frametime.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            match events::convert_event(event::read()?) {
                None => continue,
                Some(Event::AppEvent(AppEvent::Exit)) => break,
                Some(Event::EngineEvent(EngineEvent::TogglePause)) => {
                    paused = !paused;
                    debug!(paused, "Toggled pause");
                }
                Some(Event::EngineEvent(EngineEvent::Step)) => {
                    if paused {
                        grid.step();
                    }
                }
                Some(Event::AppEvent(AppEvent::CameraEvent(e))) => match e {
                    CameraEvent::MoveUp => cam.move_up(),
                    CameraEvent::MoveDown => cam.move_down(),
                    CameraEvent::MoveLeft => cam.move_left(),
                    CameraEvent::MoveRight => cam.move_right(),
                    CameraEvent::ResetView => cam.reset_view(),
                    CameraEvent::Resize { cols, rows } => {
                        cam.resize(cols, rows.saturating_sub(1));
                        queue!(stdout, terminal::Clear(ClearType::All))?;
                    }
                },
            }

            draw(stdout, &mut cam, grid, paused)?;
            continue;
        }

        let begin = Instant::now();
        last_tick = begin;

        if !paused {
            grid.step();
        }
        draw(stdout, &mut cam, grid, paused)?;

        perf.update_duration(begin.elapsed());

        if last_dump.elapsed() >= PERF_RESET {
            perf.dump("ms per frame");
            perf.clear();
            last_dump = Instant::now();
        }
    }

    Ok(())
}

fn draw(out: &mut impl Write, cam: &mut Camera, grid: &Grid, paused: bool) -> io::Result<()> {
    cam.reset();
    cam.draw(grid);

    let status_row = cam.rows() as u16;

    for (row, line) in cam.render().lines().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16), style::Print(line))?;
    }

    let status = format!(
        "generation {} | population {}{}",
        grid.generation(),
        grid.population(),
        if paused { " | paused" } else { "" }
    );

    queue!(
        out,
        cursor::MoveTo(0, status_row),
        terminal::Clear(ClearType::CurrentLine),
        style::Print(status)
    )?;

    out.flush()
}
