use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::FromArgMatches;
use cloudproxy::cli::args::Cli;
use cloudproxy::cli::commands::execute_command;
use cloudproxy::cli::proxy::{build_command, dispatch, matched};
use cloudproxy::cli::{output, CliError};
use cloudproxy::config::Settings;
use cloudproxy::infrastructure::di::ServiceContainer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let argv: Vec<OsString> = std::env::args_os().collect();

    let config_file = std::env::var_os("CLOUDPROXY_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config_file.as_deref()).unwrap_or_else(|e| fail(e.into()));
    let container = ServiceContainer::new(settings);
    let catalog = container
        .catalog_service()
        .build()
        .unwrap_or_else(|e| fail(e.into()));

    let mut matches = build_command(&catalog).get_matches_from(&argv);
    setup_logging(matches.get_count("debug"));

    if let Some(command) = matched(&catalog, &matches) {
        // argv[1..] goes to the platform CLI as typed, parent flags included
        let service = container.delegation_service();
        match dispatch(&service, &catalog, command, &argv) {
            Ok(code) => process::exit(code),
            Err(e) => fail(e),
        }
    }

    let cli = Cli::from_arg_matches_mut(&mut matches).unwrap_or_else(|e| e.exit());
    if let Err(e) = execute_command(&cli, &container, &catalog) {
        fail(e);
    }
}

fn fail(e: CliError) -> ! {
    if e.is_provisioning() {
        eprintln!("{}", e);
    } else {
        output::error(&e);
    }
    process::exit(e.exit_code());
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
