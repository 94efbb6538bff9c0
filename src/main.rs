use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use giftbox::config::{self, Options};
use giftbox::effects::Effect;
use giftbox::effects::giftbox::GiftboxEffect;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

// Smallest terminal that still fits the box and the caption card
const MIN_COLS: u16 = 10;
const MIN_ROWS: u16 = 5;

/// The alternate screen owns the terminal while running, so logs only go
/// to a file, and only when one is asked for.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_effect<E: Effect>(options: &Options) -> Result<()> {
    let (cols, rows) = terminal::size().context("no terminal to draw on")?;
    if cols < MIN_COLS || rows < MIN_ROWS {
        bail!("terminal is {cols}x{rows}, need at least {MIN_COLS}x{MIN_ROWS}");
    }

    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)
        .context("entering the alternate screen")?;

    let result = drive::<E>(&mut stdout, cols, rows, options);

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn is_exit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.kind == KeyEventKind::Press
        && (key.code == KeyCode::Char('q')
            || key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

fn drive<E: Effect>(stdout: &mut impl Write, cols: u16, rows: u16, options: &Options) -> Result<()> {
    let mut effect = E::new(cols as usize, rows as usize * 2, options);

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            if is_exit_key(&event) {
                break;
            }
            match &event {
                Event::Resize(cols, rows) => {
                    effect.resize(*cols as usize, *rows as usize * 2);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => effect.handle_event(&event),
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        let mut stepped = false;
        while accumulator >= FIXED_DT {
            effect.update(FIXED_DT);
            accumulator -= FIXED_DT;
            stepped = true;
        }

        if stepped {
            effect.render(stdout)?;
        }
    }

    log::info!("exit requested");
    Ok(())
}

fn main() -> Result<()> {
    let options = Options::parse();
    init_logging(options.log_file.as_deref())?;

    if let Some(color) = options.bg_color {
        config::set_bg_color(color);
    }
    log::info!("giftbox starting: {options:?}");

    run_effect::<GiftboxEffect>(&options)
}
