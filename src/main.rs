mod window;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context};
use clap::Parser;
use sdl2::keyboard::Keycode;

use tileblit::util::FrameTimer;
use tileblit::{
    Blitter, Capabilities, ImageSource, PixelBuffer, SessionConfig, Strategy, StrategyMode,
    TileMap,
};
use window::{Display, InputEvent, RenderTarget};

/// Software sprite compositor demo: tiles the window with alpha-keyed sprites
#[derive(Parser, Debug)]
#[command(name = "tileblit", version, about)]
struct Args {
    /// Session config (JSON). Missing file means defaults.
    #[arg(short, long, default_value = "tileblit.json")]
    config: PathBuf,

    /// Logical buffer width
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Logical buffer height
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Integer window scale
    #[arg(short, long)]
    scale: Option<u32>,

    /// Sprite sheet to draw from
    #[arg(short, long)]
    tile_sheet: Option<PathBuf>,

    /// Force a blit strategy instead of choosing per draw call
    #[arg(long, value_enum)]
    strategy: Option<StrategyMode>,

    /// Lock presentation to the display refresh
    #[arg(long)]
    vsync: bool,

    /// Quit after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut SessionConfig) {
        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(s) = self.scale {
            config.scale = s;
        }
        if let Some(path) = &self.tile_sheet {
            config.tile_sheet.clone_from(path);
        }
        if let Some(mode) = self.strategy {
            config.strategy = mode;
        }
        config.vsync |= self.vsync;
    }
}

/// Load the configured sheet, or stand in a generated one so the session
/// can still run
fn load_sheet(config: &SessionConfig) -> ImageSource {
    match ImageSource::load(&config.tile_sheet) {
        Ok(sheet) => sheet,
        Err(e) => {
            log::warn!("{}; using a generated placeholder sheet", e);
            ImageSource::placeholder_sheet(config.tile_size)
        },
    }
}

fn log_strategies(blitter: &Blitter, tile_size: u32) {
    let caps = blitter.capabilities();
    log::info!(
        "vector support: 4-wide {}, 8-wide {}",
        caps.vector4,
        caps.vector8
    );
    let full = blitter.strategy_for(tile_size as i32);
    log::info!(
        "strategy {:?}: {} for full {}px tiles",
        blitter.mode(),
        full.name(),
        tile_size
    );
    for s in Strategy::ALL {
        log::debug!("{} processes {} px per step", s.name(), s.lanes());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = SessionConfig::load_or_default(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    args.apply(&mut config);
    config.validate()?;

    let (mut display, texture_creator) = Display::with_options(
        "tileblit",
        config.width,
        config.height,
        config.scale,
        config.vsync,
    )
    .map_err(|e| anyhow!(e))
    .context("creating window")?;
    let mut target = RenderTarget::with_size(&texture_creator, config.width, config.height)
        .map_err(|e| anyhow!(e))?;
    let mut buffer = PixelBuffer::try_filled(config.width, config.height, config.clear_color)?;

    let sheet = load_sheet(&config);
    let map = TileMap::covering(
        config.width,
        config.height,
        config.tile_size,
        config.layers.clone(),
    );
    let blitter = Blitter::with_capabilities(Capabilities::detect()).with_mode(config.strategy);
    log_strategies(&blitter, config.tile_size);

    let mut timer = FrameTimer::new(60);

    'main: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(_) => {},
            }
        }

        let start = Instant::now();
        map.draw(&blitter, &mut buffer, &sheet)
            .context("composing frame")?;
        let ms = timer.record(start.elapsed());
        log::debug!("frame {} composed in {:.3}ms", timer.frame_count(), ms);

        display
            .present(&mut target, &buffer)
            .map_err(|e| anyhow!(e))?;

        if args.frames.is_some_and(|n| timer.frame_count() >= n) {
            break;
        }
    }

    let (p1, p50, p99) = timer.percentiles_ms();
    log::info!(
        "average frame time: {:.3}ms over {} frames (p1 {:.3}, p50 {:.3}, p99 {:.3})",
        timer.session_average_ms(),
        timer.frame_count(),
        p1,
        p50,
        p99
    );
    let (min, max) = timer.min_max_ms();
    log::info!(
        "last {} frames: avg {:.3}ms, min {:.3}ms, max {:.3}ms",
        timer.window_len(),
        timer.rolling_average_ms(),
        min,
        max
    );

    Ok(())
}
