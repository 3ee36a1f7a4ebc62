use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use glam::Vec3;
use kestrel_input::{ActionConfig, ActionMap, BindingsConfig, InputKey};
use kestrel_kernel::{Engine, EngineConfig};
use kestrel_render::DebugTextRenderer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kestrel-cli", about = "Headless tools for the kestrel engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Action bindings JSON (defaults to the built-in camera layout)
    #[arg(long, global = true)]
    bindings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the frame loop headless with scripted input
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Simulated time per frame in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Keys held from the first frame, e.g. `--hold KeyW --hold LeftShift`
        #[arg(long, value_parser = parse_key)]
        hold: Vec<InputKey>,
        /// Frame on which held keys are released (after frame 0)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        release_at: Option<u64>,
        /// Print the camera every N frames
        #[arg(long, default_value = "10")]
        print_every: u64,
    },
    /// Validate bindings and list their actions
    Bindings {
        /// Write the bindings out as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn parse_key(name: &str) -> Result<InputKey, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown key {name:?}"))
}

/// Value written for the held keys on `frame`, if any: pressed on the first
/// frame, released on `release_at`.
fn held_value(frame: u64, release_at: Option<u64>) -> Option<f32> {
    if frame == 0 {
        Some(1.0)
    } else if Some(frame) == release_at {
        Some(0.0)
    } else {
        None
    }
}

fn load_bindings(path: Option<&PathBuf>) -> anyhow::Result<BindingsConfig> {
    Ok(match path {
        Some(path) => BindingsConfig::load(path)?,
        None => BindingsConfig::camera_defaults(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("kestrel-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", kestrel_common::crate_info());
            println!("ecs: {}", kestrel_ecs::crate_info());
            println!("input: {}", kestrel_input::crate_info());
            println!("render: {}", kestrel_render::crate_info());
            println!("kernel: {}", kestrel_kernel::crate_info());
        }
        Commands::Simulate {
            frames,
            frame_ms,
            hold,
            release_at,
            print_every,
        } => {
            let config = match &cli.config {
                Some(path) => EngineConfig::load(path)?,
                None => EngineConfig::default(),
            };
            let bindings = load_bindings(cli.bindings.as_ref())?;
            let mut engine = Engine::new(config, &bindings)?;
            engine.spawn_demo_cube(Vec3::ZERO)?;
            let mut renderer = DebugTextRenderer::new();
            let elapsed = Duration::from_millis(frame_ms);

            println!("Simulating {frames} frames at {frame_ms}ms, holding {hold:?}");
            for frame in 0..frames {
                if let Some(value) = held_value(frame, release_at) {
                    for key in hold.iter().copied() {
                        if !engine.input_mut().add_key_state(key, value) {
                            tracing::warn!(?key, "no device for key");
                        }
                    }
                }

                let report = engine.run_frame_with(elapsed, &mut renderer)?;
                if print_every > 0 && frame % print_every == 0 {
                    let eye = engine.camera().position;
                    println!(
                        "frame {frame:>4}: eye=({:.2}, {:.2}, {:.2}) changes={} draws={:?}",
                        eye.x, eye.y, eye.z, report.input_changes, report.submitted
                    );
                }
            }

            engine.shutdown();
            print!("{}", renderer.last_output());
        }
        Commands::Bindings { out } => {
            let bindings = load_bindings(cli.bindings.as_ref())?;
            let map = ActionMap::from_config(&bindings)?;
            println!("{} actions", map.len());
            for action in &bindings.actions {
                let kind = match action {
                    ActionConfig::Button { .. } => "button".to_string(),
                    ActionConfig::Vector { composite, .. } => format!("vector/{composite:?}"),
                };
                println!(
                    "  {:<10} {:<14} {} mappings",
                    action.name(),
                    kind,
                    action.mapping_count()
                );
            }
            if let Some(path) = out {
                bindings.save(&path)?;
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_press_then_release() {
        assert_eq!(held_value(0, Some(5)), Some(1.0));
        assert_eq!(held_value(3, Some(5)), None);
        assert_eq!(held_value(5, Some(5)), Some(0.0));
        assert_eq!(held_value(5, None), None);
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(parse_key("KeyW"), Ok(InputKey::KeyW));
        assert!(parse_key("NotAKey").is_err());
    }

    #[test]
    fn release_at_must_follow_the_press() {
        assert!(Cli::try_parse_from(["kestrel-cli", "simulate", "--release-at", "0"]).is_err());
        let cli = Cli::try_parse_from(["kestrel-cli", "simulate", "--release-at", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simulate {
                release_at: Some(3),
                ..
            }
        ));
    }
}
