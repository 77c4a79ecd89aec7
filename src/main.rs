//! Roto Bounce entry point
//!
//! Headless runner: drives the simulation from a clock, renders every frame
//! in software, and optionally records the frames to video.
//!
//! Usage:
//!   roto-bounce --seconds 10 --record bounce.mp4 --gif bounce.gif
//!   RUST_LOG=debug roto-bounce --realtime --bounded

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use roto_bounce::config::{BoundsMode, SimConfig};
use roto_bounce::consts::{SIM_DT, TARGET_HZ};
use roto_bounce::platform::{FixedClock, FrameClock, WallClock};
use roto_bounce::record::{FfmpegRecorder, FrameSink, VideoSettings, transcode_gif};
use roto_bounce::render::{Canvas, Style, draw_scene};
use roto_bounce::sim::{ContactPhase, Simulator, TickInput, tick};

#[derive(Parser)]
#[command(name = "roto-bounce")]
#[command(about = "Bounce a ball inside a rotating square and optionally record it")]
struct Args {
    /// JSON config file (defaults apply to missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Override the color RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pace frames against the wall clock instead of a fixed step
    #[arg(long)]
    realtime: bool,

    /// Treat the viewport edges as walls
    #[arg(long)]
    bounded: bool,

    /// Reset the ball every N seconds
    #[arg(long)]
    reset_every: Option<f32>,

    /// Record frames to this video file (needs ffmpeg on PATH)
    #[arg(long)]
    record: Option<PathBuf>,

    /// Also transcode the recording into this GIF
    #[arg(long, requires = "record")]
    gif: Option<PathBuf>,

    /// Encoder executable
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: String,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.bounded {
        config.bounds = BoundsMode::Viewport;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    log::info!(
        "Roto Bounce starting: seed={}, bounds={:?}, {} s",
        config.seed,
        config.bounds,
        args.seconds
    );

    let viewport = config.viewport;
    let mut sim = Simulator::new(config)?;
    let mut canvas = Canvas::new(viewport.width, viewport.height);
    let style = Style::default();

    let settings = VideoSettings {
        program: args.ffmpeg.clone(),
        fps: TARGET_HZ as u32,
        ..VideoSettings::default()
    };
    let mut recorder = match &args.record {
        Some(path) => Some(FfmpegRecorder::spawn(
            path,
            viewport.width,
            viewport.height,
            &settings,
        )?),
        None => None,
    };

    let mut clock: Box<dyn FrameClock> = if args.realtime {
        Box::new(WallClock::new(TARGET_HZ))
    } else {
        Box::new(FixedClock::new(SIM_DT))
    };

    let mut input = TickInput::default();
    let reset_every = args.reset_every.filter(|secs| *secs > 0.0);
    let mut next_reset = reset_every.unwrap_or(f32::INFINITY);
    let mut contacts = 0u64;
    let mut time = 0.0f32;

    while time < args.seconds {
        let dt = clock.next_dt();
        time += dt;

        if time >= next_reset {
            input.reset = true;
            next_reset += reset_every.unwrap_or(f32::INFINITY);
        }

        tick(&mut sim, &input, dt);
        // Clear one-shot inputs after processing
        input.reset = false;

        if sim.phase() == ContactPhase::Colliding {
            contacts += 1;
        }

        draw_scene(&sim.view(), &mut canvas, &style);
        if let Some(recorder) = recorder.as_mut() {
            recorder.push(&canvas)?;
        }
    }

    let ball = sim.ball();
    log::info!(
        "Finished {} ticks ({:.2} s simulated): {} contacts, ball at ({:.1}, {:.1})",
        sim.time_ticks(),
        sim.elapsed(),
        contacts,
        ball.pos.x,
        ball.pos.y
    );

    if let Some(mut recorder) = recorder.take() {
        recorder.finish()?;
        if let Some(gif) = &args.gif {
            transcode_gif(&args.ffmpeg, recorder.output(), gif)?;
        }
    }

    Ok(())
}
