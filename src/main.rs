mod cli;
mod engine;
mod logging;
mod output;
mod source;

use std::error::Error;
use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;
use csvqr_runtime::{Controller, DashConfig, load_config_from_path};
use csvqr_view::MemorySurface;

use crate::cli::{Args, OutputFormat};
use crate::engine::{EngineSwitch, HeadlessEngine};
use crate::output::PageReport;
use crate::source::PageBlocks;

// Upper bound on virtual time spent waiting for timers after boot.
const SETTLE_LIMIT_MS: u64 = 60_000;

const EXIT_USAGE: u8 = 1;
const EXIT_IO: u8 = 2;

fn main() -> ExitCode {
    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    if let Err(e) = logging::init(args.level(), args.log_file.as_deref()) {
        eprintln!("csvqr-dash: logging setup failed: {}", e);
        return ExitCode::from(EXIT_IO);
    }
    execute(&args)
}

/// Bad arguments exit with 1; `--help` and `--version` exit with 0.
fn parse_args<I, T>(argv: I) -> Result<Args, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|err| {
        let _ = err.print();
        if err.use_stderr() {
            ExitCode::from(EXIT_USAGE)
        } else {
            ExitCode::SUCCESS
        }
    })
}

fn execute(args: &Args) -> ExitCode {
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("csvqr-dash: {}", e);
            ExitCode::from(EXIT_IO)
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => DashConfig::default(),
    };
    let blocks = match &args.report {
        Some(path) => PageBlocks::load_html(path, &config.blocks)?,
        None => PageBlocks::load_files(
            args.run.as_deref(),
            args.profile.as_deref(),
            args.dag.as_deref(),
            &config.blocks,
        )?,
    };
    log::debug!("{} document blocks found", blocks.len());

    let ctl = render_session(args, config, &blocks);
    let report = PageReport::new(ctl.surface(), ctl.state(), ctl.stats(), ctl.now_ms());
    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

/// Boots a headless page, replays the requested engine delay and resizes, and runs
/// timers until the page is quiet.
fn render_session(
    args: &Args,
    config: DashConfig,
    blocks: &PageBlocks,
) -> Controller<MemorySurface> {
    let page = MemorySurface::with_regions(&config.regions, args.width);
    let switch = EngineSwitch::new(!args.no_engine && args.engine_delay_ms.is_none());
    let engine = HeadlessEngine::new(switch.clone(), args.out_dir.clone());
    let frame_ms = config.timing.frame_ms;

    let mut ctl = Controller::new(page, Box::new(engine), config);
    ctl.boot(blocks);
    if let Some(delay) = args.engine_delay_ms {
        ctl.advance_by(delay);
        switch.load();
    }
    for _ in 0..args.resize {
        ctl.notify_resize();
        ctl.advance_by(frame_ms);
    }
    ctl.settle(SETTLE_LIMIT_MS);
    log::info!(
        "{:?} after {} ms; {} charts rendered",
        ctl.state(),
        ctl.now_ms(),
        ctl.stats().rendered
    );
    ctl
}
