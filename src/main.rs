use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use fireworks::catalog::{CATALOG, Tint};
use fireworks::config::{Args, Config};
use fireworks::scene::{Scene, show};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

const FIXED_DT: f32 = 1.0 / 60.0;

fn print_catalog() {
    println!("Firework kinds (--kind) and their types (--type):");
    for (i, kind) in CATALOG.iter().enumerate() {
        println!();
        println!("  [{}] {:<10} {} - {}", i + 1, kind.id, kind.name, kind.desc);
        for ty in kind.types {
            let color = match ty.tint {
                Tint::Solid((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
                Tint::Multi => "multi".to_string(),
            };
            println!("      {:<10} {:<16} {:<8} size {}", ty.id, ty.label, color, ty.size);
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> fireworks::error::Result<()> {
    // Logging to the terminal would scribble over the show, so it stays off
    // unless asked for.
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

fn frame_loop<S: Scene, W: Write>(scene: &mut S, out: &mut W) -> std::io::Result<()> {
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            match &event {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    // Pass non-exit key events to the scene
                    scene.handle_event(&event);
                }
                Event::Resize(cols, rows) => {
                    scene.resize(*cols as usize, *rows as usize);
                    execute!(out, Clear(ClearType::All))?;
                }
                _ => {
                    scene.handle_event(&event);
                }
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            scene.update(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        scene.render(out)?;
    }

    Ok(())
}

fn run_scene<S: Scene>(mut scene: S) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let result = frame_loop(&mut scene, &mut stdout);

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.list {
        print_catalog();
        return Ok(());
    }

    let config = Config::try_from(args)?;
    init_logging(config.log_file.as_deref())?;

    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let scene = show::Show::new(&config, cols as usize, rows as usize);
    let (kind, ty) = scene.selected();
    log::info!(
        "starting show: {cols}x{rows}, {} / {}, auto={}, seed={:?}",
        kind.name,
        ty.label,
        config.auto,
        config.seed
    );

    run_scene(scene).context("terminal session failed")?;
    log::info!("show ended");
    Ok(())
}
