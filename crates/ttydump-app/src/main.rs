mod cli;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use std::io;
use std::process::ExitCode;
use ttydump_core::{
    list_ports, signal, DeviceSession, Formatter, MonitorError, ReadLoop, StopReason, TeeSink,
};

use crate::cli::Cli;
use crate::settings::Settings;

/// The device was never locked: nothing on it was touched.
const EXIT_UNLOCKED: u8 = 1;
/// The device was locked, then something failed; the lock has been released.
const EXIT_LOCKED: u8 = 2;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_UNLOCKED)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.list {
        let ports = list_ports();
        if ports.is_empty() {
            info!("No serial ports found");
        }
        for port in ports {
            println!("{port}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    signal::install_stop_handler().context("installing signal handlers")?;

    let cfg = cli.into_options(&Settings::load()).resolve()?;

    let tee = match &cfg.tee_path {
        Some(path) => {
            info!("Opening output file {}...", path.display());
            let tee = TeeSink::create(path)
                .with_context(|| format!("couldn't open output file '{}'", path.display()))?;
            info!("Opened {}", path.display());
            Some(tee)
        }
        None => None,
    };

    let mut session = match DeviceSession::open(&cfg.device, cfg.baud_rate) {
        Ok(session) => session,
        Err(e) => {
            error!("{e}");
            let code = if e.was_locked() { EXIT_LOCKED } else { EXIT_UNLOCKED };
            return Ok(ExitCode::from(code));
        }
    };

    info!(
        "Reading {} at {} baud",
        session.path().display(),
        session.baud_rate().rate()
    );

    let mut read_loop = ReadLoop::new(Formatter::from_config(&cfg), io::stderr().lock(), tee)
        .with_stop_flag(signal::stop_flag());
    let outcome = read_loop.run(&mut session);
    drop(read_loop);

    let code = match outcome {
        Ok(StopReason::Interrupted) => ExitCode::SUCCESS,
        Ok(StopReason::Timeout) => {
            warn!("Read timeout");
            ExitCode::SUCCESS
        }
        Err(MonitorError::Read(e)) => {
            error!("Read error: {e}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(EXIT_LOCKED)
        }
    };

    session.close();
    Ok(code)
}
