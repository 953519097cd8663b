// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gmvscan — command-line host for the barcode scanner bridge.
//
// Entry point. Initialises logging, loads bridge config and scan settings,
// runs one scan through the platform bridge (or a simulated one), and
// prints the outcome as JSON.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use gmvscan_bridge::scripted::ScriptedBridge;
use gmvscan_bridge::{NativeBridge, Scanner, platform_bridge};
use gmvscan_core::{BridgeConfig, ScanOutcome, ScanRequest, get_default_settings};

use services::{data_dir, inputs, simulate};

/// Run one barcode scan through the native bridge.
#[derive(Parser, Debug)]
#[command(name = "gmvscan")]
#[command(version)]
#[command(about = "Run one barcode scan through the native scanner bridge")]
struct Args {
    /// Partial settings document (JSON) merged over the defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Bridge config file (JSON); defaults to the data directory's bridge.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated symbologies to enable, e.g. QRCode,EAN13
    #[arg(short, long)]
    types: Option<String>,

    /// Detector width as a fraction of the frame
    #[arg(long)]
    width: Option<f64>,

    /// Detector height as a fraction of the frame
    #[arg(long)]
    height: Option<f64>,

    /// Answer the scan from a simulated native side:
    /// result:<payload>, error:<code>, or silent
    #[arg(long)]
    simulate: Option<String>,

    /// Print the default settings document and exit
    #[arg(long)]
    print_defaults: bool,

    /// Print the positional request that would be sent, and exit
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "gmvscan failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if args.print_defaults {
        println!("{}", serde_json::to_string_pretty(&get_default_settings())?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &args.config {
        // An explicitly named config must exist and parse.
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::load_or_default(&data_dir::default_config_path()),
    };

    let settings = inputs::load_settings(args.settings.as_deref())?;
    let overrides = inputs::flag_override(&settings, args.types.as_deref(), args.width, args.height);
    let settings = settings.merge(overrides);

    if args.dry_run {
        settings.detector_size.validate()?;
        let request = ScanRequest::from_settings(&settings);
        println!("{}", serde_json::Value::Array(request.to_args()));
        return Ok(ExitCode::SUCCESS);
    }

    let bridge: Box<dyn NativeBridge> = match &args.simulate {
        Some(spec) => {
            let reply = simulate::parse_reply(spec)?;
            Box::new(ScriptedBridge::threaded().with_reply(reply))
        }
        None => platform_bridge(),
    };

    tracing::info!(platform = bridge.platform_name(), "gmvscan starting");

    let scanner = Scanner::with_config(bridge, config);
    let outcome = scanner.scan_blocking(Some(settings))?;
    Ok(report(&outcome, scanner.config()))
}

/// Print the outcome as JSON and pick the exit code.
fn report(outcome: &ScanOutcome, config: &BridgeConfig) -> ExitCode {
    match outcome {
        Ok(payload) => {
            println!("{}", json!({ "payload": payload }));
            ExitCode::SUCCESS
        }
        Err(err) => {
            let info = err.to_info(config);
            println!("{}", json!({ "error": info }));
            if info.cancelled {
                ExitCode::from(1)
            } else {
                ExitCode::from(3)
            }
        }
    }
}
