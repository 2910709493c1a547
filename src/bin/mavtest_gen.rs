use std::env;
use std::error::Error as _;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use mavtest_gen::{GeneratorConfig, Generator, ProcessSource};
use tracing_subscriber::EnvFilter;

enum Action {
    Run(GeneratorConfig),
    Help,
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(Action::Run(config)) => config,
        Ok(Action::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!();
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let source = ProcessSource::from_config(&config);
    let output = match Generator::new(config, source).generate() {
        Ok(output) => output,
        Err(err) => {
            tracing::error!("generation failed: {}", err);
            let mut cause = err.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {inner}");
                cause = inner.source();
            }
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    if let Err(err) = lock.write_all(output.text.as_bytes()).and_then(|_| lock.flush()) {
        tracing::error!("failed to write generated tests: {}", err);
        return ExitCode::FAILURE;
    }

    match serde_json::to_string(&output.report) {
        Ok(json) => tracing::info!(report = %json, "generation report"),
        Err(err) => tracing::warn!("could not serialise report: {}", err),
    }
    ExitCode::SUCCESS
}

/// Generated text owns stdout, so logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut config_path: Option<PathBuf> = None;
    let mut reference_dir: Option<PathBuf> = None;
    let mut implementations_dir: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config_path = Some(value_for(arg, iter.next())?),
            "--reference-dir" => reference_dir = Some(value_for(arg, iter.next())?),
            "--implementations-dir" => implementations_dir = Some(value_for(arg, iter.next())?),
            "help" | "--help" | "-h" => return Ok(Action::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(&path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => GeneratorConfig::default(),
    };
    if let Some(dir) = reference_dir {
        config.reference_dir = dir;
    }
    if let Some(dir) = implementations_dir {
        config.implementations_dir = dir;
    }
    Ok(Action::Run(config))
}

fn value_for(flag: &str, value: Option<&String>) -> Result<PathBuf, String> {
    value
        .map(PathBuf::from)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn print_help() {
    eprintln!(
        r#"mavtest-gen

Writes end-to-end javascript tests, built from the C reference binaries' output, to stdout.

USAGE:
    mavtest-gen [OPTIONS] > made_tests.js

OPTIONS:
    --config <FILE>               JSON config (message_sets, versions, reference_dir, implementations_dir)
    --reference-dir <DIR>         Directory holding testmav<version>_<set> binaries
                                  [default: ../../../generator/C/test/posix/]
    --implementations-dir <DIR>   Directory holding mavlink_<set>_v<version>/mavlink.tests.js
                                  [default: ../implementations]
    -h, --help                    Print this help message

Set RUST_LOG=debug to see one log line per generated test.
"#
    );
}
