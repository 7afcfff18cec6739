mod cli;

use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossbeam_channel::{Receiver, bounded};
use wave_control::{
    Config,
    config::ConfigOverrides,
    pipeline::{
        ActionDispatcher, CommandKeyInjector, EventSink, JsonLinesSource, KeyInjector,
        LandmarkSource, LineKeyInjector, PipelineEvent, available_cameras, start_pipeline,
    },
    types::GestureAction,
};

use cli::{Cli, Commands, ConfigAction, InjectorKind, RunArgs};

const STATUS_QUEUE: usize = 64;
const POLL_INTERVAL: Duration = Duration::from_millis(20);
// How long a blocked read may hold up shutdown after Ctrl+C.
const STOP_GRACE: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Run(args) => run(args, cli.config.as_ref()),
        Commands::ListCameras => list_cameras(),
        Commands::Gestures => {
            let config = load_config(cli.config.as_ref(), &ConfigOverrides::default())?;
            print_gestures(&config);
            Ok(())
        }
        Commands::Config {
            action: ConfigAction::Show(tuning),
        } => {
            let config = load_config(cli.config.as_ref(), &tuning.overrides())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>, overrides: &ConfigOverrides) -> Result<Config> {
    Config::resolve(path, overrides).context("failed to load configuration")
}

fn run(args: RunArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let config = load_config(config_path, &args.tuning.overrides())?;
    let source = open_source(&args.input)?;
    let injector = build_injector(&args)?;
    let dispatcher = ActionDispatcher::new(config.keys, injector);

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_flag = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    let (event_tx, event_rx) = bounded(STATUS_QUEUE);
    let status = thread::spawn(move || print_status(event_rx));

    log::info!(
        "window {} frames, threshold {:.2}, calibration {:.1}s",
        config.filter.window_size,
        config.filter.consistency_threshold,
        config.session.calibration_secs
    );
    let handle = start_pipeline(config, source, dispatcher, EventSink::new(event_tx));

    while !handle.is_finished() {
        if interrupted.load(Ordering::SeqCst) {
            handle.request_stop();
            let deadline = Instant::now() + STOP_GRACE;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(POLL_INTERVAL);
            }
            if !handle.is_finished() {
                // The stop flag is set, so the worker can no longer dispatch.
                log::warn!("input still blocked after stop request, exiting");
                std::process::exit(130);
            }
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    let result = handle.join();
    let _ = status.join();

    let summary = result.context("gesture pipeline failed")?;
    log::info!(
        "processed {} frames, {} actions dispatched, {} suppressed ({:?})",
        summary.frames,
        summary.actions,
        summary.suppressed,
        summary.reason
    );
    Ok(())
}

fn open_source(input: &Path) -> Result<Box<dyn LandmarkSource>> {
    if input == Path::new("-") {
        return Ok(Box::new(JsonLinesSource::stdin()));
    }
    let source = JsonLinesSource::open(input)
        .with_context(|| format!("cannot read landmark frames from {}", input.display()))?;
    Ok(Box::new(source))
}

fn build_injector(args: &RunArgs) -> Result<Box<dyn KeyInjector>> {
    match args.injector {
        InjectorKind::Line => Ok(Box::new(LineKeyInjector::new(io::stdout()))),
        InjectorKind::Command => {
            let injector = CommandKeyInjector::from_command_line(&args.command)
                .ok_or_else(|| anyhow!("--injector command needs --command PROGRAM [ARGS...]"))?;
            log::info!("injecting keys through `{}`", injector.program());
            Ok(Box::new(injector))
        }
    }
}

fn print_status(event_rx: Receiver<PipelineEvent>) {
    for event in event_rx.iter() {
        match event {
            PipelineEvent::SessionStarted => {
                eprintln!("Keep your hand visible to the camera; Ctrl+C to stop.")
            }
            PipelineEvent::CalibrationProgress { remaining } => {
                eprintln!("Calibrating... {:.0}s remaining", remaining.as_secs_f32().ceil())
            }
            PipelineEvent::CalibrationComplete => eprintln!("Calibration complete."),
            PipelineEvent::ActionFired { action, key } => {
                eprintln!("{}{} [{}]", action.emoji(), action.display_name(), key.name())
            }
            PipelineEvent::Rearmed => eprintln!("Ready for the next gesture."),
            PipelineEvent::ActionSuppressed { .. } => {}
            PipelineEvent::SessionStopped { reason } => eprintln!("Stopped ({reason:?})."),
        }
    }
}

fn list_cameras() -> Result<()> {
    let cameras = available_cameras().context("failed to enumerate cameras")?;
    if cameras.is_empty() {
        println!("No cameras found.");
    }
    for camera in cameras {
        println!("{}", camera.describe());
    }
    Ok(())
}

fn print_gestures(config: &Config) {
    for action in GestureAction::ALL {
        let fingers = action.finger_count();
        println!(
            "{}{} finger{} -> {} ({})",
            action.emoji(),
            fingers,
            if fingers == 1 { "" } else { "s" },
            action.display_name(),
            config.keys.key_for(action).name()
        );
    }
    println!("✊ closed fist or open palm -> neutral");
}
