use std::error::Error;
use std::io;

use chrono::Utc;

use shippulse_core::config::DashboardConfig;
use shippulse_dash::tracing_setup::{self, Verbosity};
use shippulse_dash::{DashApp, MetricsSource, MockMetricsSource};

#[derive(Debug, Default, Clone)]
struct RuntimeOptions {
    demo_mode: bool,
    verbose: bool,
    quiet: bool,
    no_color: bool,
}

fn parse_runtime_options() -> Result<RuntimeOptions, Box<dyn Error>> {
    let mut options = RuntimeOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                options.demo_mode = true;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
            }
            "-q" | "--quiet" => {
                options.quiet = true;
            }
            "--no-color" => {
                options.no_color = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unknown argument: {other}"),
                )
                .into());
            }
        }
    }

    if !options.demo_mode
        && let Ok(value) = std::env::var("SHIPPULSE_DEMO")
    {
        let value = value.trim();
        options.demo_mode = matches!(value, "1" | "true" | "TRUE" | "True");
    }

    Ok(options)
}

fn print_help() {
    println!("shippulse-dash");
    println!();
    println!("Renders every dashboard screen's view model as JSON.");
    println!();
    println!("Usage:");
    println!("  shippulse-dash [--demo] [-v | -q] [--no-color]");
    println!();
    println!("Flags:");
    println!("  --demo            Use the synthetic sample data source");
    println!("  -v, --verbose     Debug-level logging to stderr");
    println!("  -q, --quiet       Errors only");
    println!("  --no-color        Suppress ANSI colors in logs");
    println!("  -h, --help        Show this help message");
    println!();
    println!("Environment:");
    println!("  SHIPPULSE_DEMO=true|false");
    println!("  SHIPPULSE_LOG=<directives>        e.g. shippulse=debug");
    println!("  SHIPPULSE_LOOKBACK_DAYS=<days>");
    println!("  SHIPPULSE_CHART_PERIOD=day|week|month");
    println!("  SHIPPULSE_INCLUDE_TREND=true|false");
    println!("  SHIPPULSE_INCLUDE_BENCHMARK=true|false");
}

fn build_source(options: &RuntimeOptions) -> Box<dyn MetricsSource> {
    if options.demo_mode {
        Box::new(MockMetricsSource::sample())
    } else {
        Box::new(MockMetricsSource::empty())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = parse_runtime_options()?;
    tracing_setup::init_subscriber(
        Verbosity::from_flags(options.verbose, options.quiet),
        options.no_color,
    );

    let config = DashboardConfig::default().with_env_overrides().validated()?;
    let now = Utc::now();
    let mut app = DashApp::new(config, build_source(&options), now.date_naive());

    let models = app.refresh_all(now)?;
    println!("{}", serde_json::to_string_pretty(&models)?);
    Ok(())
}
