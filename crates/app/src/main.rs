use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use spectrum_visualiser_core::{
    AppConfig, CommandRecorder, DrawCommand, RenderLoop, SyntheticSource, VisualizerMode,
    VisualizerSession,
};
use tracing_subscriber::EnvFilter;

fn main() -> spectrum_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_headless(args),
        Commands::Modes => {
            list_modes();
            Ok(())
        }
        Commands::Config { output } => write_default_config(output.as_deref()),
    }
}

fn run_headless(args: RunArgs) -> spectrum_visualiser_core::Result<()> {
    let config = args.resolve_config()?;
    tracing::info!(
        mode = %config.visualizer.mode,
        sensitivity = config.visualizer.sensitivity,
        frames = args.frames,
        "starting headless run"
    );

    let mut session = VisualizerSession::from_config(&config);
    let mut source = SyntheticSource::from_config(&config.analysis);
    let mut surface = CommandRecorder::new(config.surface.width, config.surface.height);
    let mut last_frame: Vec<DrawCommand> = Vec::new();
    let cycle = args.cycle.filter(|frames| *frames > 0);

    let summary = RenderLoop::new(args.fps)
        .with_max_frames(args.frames)
        .run(&mut session, &mut source, &mut surface, |stats, session, surface| {
            last_frame = surface.take_commands();
            if let Some(beat) = stats.beat {
                tracing::debug!(frame = stats.frame, spawned = beat.spawned, bass = beat.bass, "beat");
            }
            if let Some(every) = cycle {
                if stats.frame % every == 0 {
                    session.set_mode(next_mode(session.mode()));
                }
            }
            Ok(())
        })?;

    tracing::info!(
        frames = summary.frames,
        skipped = summary.skipped,
        beats = summary.beats,
        peak_particles = summary.peak_particles,
        peak_shockwaves = summary.peak_shockwaves,
        "run complete"
    );

    if let Some(path) = args.dump {
        let json = serde_json::to_string_pretty(&last_frame)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), commands = last_frame.len(), "wrote last frame");
    }

    Ok(())
}

fn next_mode(mode: VisualizerMode) -> VisualizerMode {
    let all = VisualizerMode::ALL;
    let index = all.iter().position(|m| *m == mode).unwrap_or(0);
    all[(index + 1) % all.len()]
}

fn list_modes() {
    for mode in VisualizerMode::ALL {
        println!("{:<16} {:<20} {:?}", mode.id(), mode.label(), mode.domain());
    }
}

fn write_default_config(output: Option<&Path>) -> spectrum_visualiser_core::Result<()> {
    let json = AppConfig::default().to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Audio-reactive spectrum visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render frames headlessly from a synthetic signal.
    Run(RunArgs),
    /// List the available visual styles.
    Modes,
    /// Print the default configuration as JSON.
    Config {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Visual style, e.g. BARS or BEAT_PARTICLES.
    #[arg(short, long)]
    mode: Option<VisualizerMode>,
    /// Reaction strength, nominally 0.5 to 2.0.
    #[arg(short, long)]
    sensitivity: Option<f32>,
    /// Number of frames to render.
    #[arg(short, long, default_value_t = 300)]
    frames: u64,
    /// Target frame rate; 0 renders as fast as possible.
    #[arg(long, default_value_t = 0)]
    fps: u32,
    /// Seed for the particle simulation.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Switch to the next style every N frames.
    #[arg(long)]
    cycle: Option<u64>,
    /// Write the draw commands of the last frame to this file.
    #[arg(long)]
    dump: Option<PathBuf>,
}

impl RunArgs {
    fn resolve_config(&self) -> spectrum_visualiser_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.visualizer.mode = mode;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.visualizer.sensitivity = sensitivity;
        }
        if let Some(seed) = self.seed {
            config.visualizer.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.surface.width = width;
        }
        if let Some(height) = self.height {
            config.surface.height = height;
        }

        config.validate()?;
        Ok(config)
    }
}
