// Softkey CLI
// Validates layouts and replays recorded pointer scripts through a keyboard session

mod replay;

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use softkey_core::{Keyboard, Layout, Settings};

use crate::replay::{parse_script, Replayer};

/// On-screen keyboard engine driver
#[derive(Parser, Debug)]
#[command(name = "softkey")]
#[command(author = "softkey contributors")]
#[command(version)]
#[command(about = "On-screen keyboard gesture and composition engine", long_about = None)]
struct Args {
    /// TOML layout file
    #[arg(short, long, value_name = "LAYOUT")]
    layout: PathBuf,

    /// Settings file (default: ~/.config/softkey/settings.toml)
    #[arg(short, long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate layout and settings, then exit
    #[arg(long)]
    check_config: bool,

    /// Keyboard size in pixels
    #[arg(long, value_name = "WxH", default_value = "1080x360", value_parser = parse_size)]
    size: (u32, u32),

    /// Pointer script to replay
    #[arg(short, long, value_name = "SCRIPT")]
    replay: Option<PathBuf>,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", value))?;
    let width = width.trim().parse().map_err(|_| format!("invalid width '{}'", width))?;
    let height = height.trim().parse().map_err(|_| format!("invalid height '{}'", height))?;
    Ok((width, height))
}

fn load_settings(args: &Args) -> Result<Settings> {
    match &args.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Settings::load_default().context("failed to load default settings"),
    }
}

fn check_config(layout: &Layout, keyboard: &Keyboard) {
    println!("Layout '{}' is valid", layout.name);
    println!("  {} rows, {} keys", layout.rows().len(), layout.len());
    println!(
        "  {} transform rules, {} dead keys",
        layout.transform_table().len(),
        layout.dead_key_table().len()
    );
    let options = keyboard.options();
    println!(
        "  long-press {}ms, double-click {}ms, compose {}",
        options.gesture.long_press_ms,
        options.gesture.double_click_ms,
        if options.compose { "on" } else { "off" }
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.verbose {
        "debug"
    } else {
        "warn"
    }))
    .init();

    let layout = Layout::from_toml_path(&args.layout)
        .with_context(|| format!("failed to load layout from {}", args.layout.display()))?;
    let settings = load_settings(&args)?;

    let mut keyboard = Keyboard::new(layout.clone(), settings.keyboard_options());
    let (width, height) = args.size;
    keyboard.resize(width, height);

    if args.check_config {
        check_config(&layout, &keyboard);
        return Ok(());
    }

    let script_path = args
        .replay
        .as_ref()
        .ok_or_else(|| anyhow!("--replay is required when not using --check-config"))?;
    let script = fs::read_to_string(script_path)
        .with_context(|| format!("failed to read {}", script_path.display()))?;
    let steps = parse_script(&script, &layout)?;
    log::debug!("replaying {} steps", steps.len());

    let mut replayer = Replayer::new(keyboard);
    for (at, intent) in replayer.run(&steps) {
        println!("{:>6}ms  {}", at, intent);
    }
    let pending = replayer.keyboard().composition();
    if !pending.is_empty() {
        println!("pending composition: {:?}", pending);
    }
    Ok(())
}
