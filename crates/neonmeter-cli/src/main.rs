mod config;

use std::collections::BTreeMap;
use std::io::Read;

use camino::Utf8PathBuf;
use miette::Diagnostic;
use neonmeter::{MeasureError, Options, Report, measure};
use serde::Serialize;
use thiserror::Error;

use config::Config;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("{0}")]
    #[diagnostic(code(neonmeter::cli::usage))]
    Usage(String),

    #[error("reading {path}")]
    #[diagnostic(code(neonmeter::cli::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}")]
    #[diagnostic(code(neonmeter::cli::config))]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("scale must be a positive number, got {0}")]
    #[diagnostic(code(neonmeter::cli::scale))]
    InvalidScale(f64),

    #[error("scale is not a number: {0:?}")]
    #[diagnostic(code(neonmeter::cli::scale))]
    InvalidScaleText(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Measure(#[from] MeasureError),

    #[error("writing JSON")]
    #[diagnostic(code(neonmeter::cli::json))]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Command {
    #[default]
    Length,
    Size,
    Report,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    group: Option<String>,
    config: Option<Utf8PathBuf>,
    json: bool,
    help: bool,
}

fn usage() -> &'static str {
    "neonmeter\n\
\n\
USAGE:\n\
  neonmeter length [--group <id>] [--json] [--config <path>] [<file.svg>|-]\n\
  neonmeter size [--group <id>] [--json] [--config <path>] [<file.svg>|-]\n\
  neonmeter report [--group <id>] [<file.svg>|-]\n\
\n\
NOTES:\n\
  - If <file.svg> is omitted or '-', input is read from stdin.\n\
  - --group matches a group id as written in the file or after decoding _x..._ escapes.\n\
  - Lengths and sizes are also printed in millimeters when a scale is configured,\n\
    via neonmeter.yaml in the working directory, --config, or NEONMETER_SCALE.\n\
  - RUST_LOG=neonmeter=debug shows what was measured.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let usage_error = || CliError::Usage(usage().to_string());
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => args.help = true,
            "length" | "size" | "report" if !command_seen && args.input.is_none() => {
                command_seen = true;
                args.command = match a.as_str() {
                    "size" => Command::Size,
                    "report" => Command::Report,
                    _ => Command::Length,
                };
            }
            "--json" => args.json = true,
            "--group" | "-g" => {
                let group = it.next().ok_or_else(usage_error)?;
                args.group = Some(group.clone());
            }
            "--config" => {
                let path = it.next().ok_or_else(usage_error)?;
                args.config = Some(Utf8PathBuf::from(path));
            }
            "-" => {
                if args.input.is_some() {
                    return Err(usage_error());
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option {other}\n\n{}", usage())));
            }
            path => {
                if args.input.is_some() {
                    return Err(usage_error());
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if !command_seen && !args.help {
        return Err(usage_error());
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

/// A pixel value, with its millimeter equivalent when a scale is known.
#[derive(Debug, Clone, Copy, Serialize)]
struct Measured {
    px: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mm: Option<f64>,
}

impl Measured {
    fn new(px: f64, config: Option<&Config>) -> Self {
        Measured {
            px,
            mm: config.map(|c| c.to_mm(px)),
        }
    }
}

impl std::fmt::Display for Measured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}px", self.px)?;
        if let Some(mm) = self.mm {
            write!(f, "/{mm:.2}mm")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct LengthOut {
    groups: BTreeMap<String, Measured>,
    total: Measured,
}

#[derive(Serialize)]
struct SizeOut {
    width: Measured,
    height: Measured,
}

fn lengths(report: &Report, config: Option<&Config>) -> LengthOut {
    LengthOut {
        groups: report
            .groups
            .iter()
            .map(|(id, g)| (id.clone(), Measured::new(g.length, config)))
            .collect(),
        total: Measured::new(report.total_length(), config),
    }
}

fn sizes(report: &Report, config: Option<&Config>) -> BTreeMap<String, SizeOut> {
    report
        .groups
        .iter()
        .map(|(id, g)| {
            let (width, height) = g.bounds.map_or((0.0, 0.0), |b| (b.width(), b.height()));
            let size = SizeOut {
                width: Measured::new(width, config),
                height: Measured::new(height, config),
            };
            (id.clone(), size)
        })
        .collect()
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let source = read_input(args.input.as_deref())?;
    let options = Options {
        group: args.group,
        ..Options::default()
    };
    let report = measure(&source, &options)?;
    tracing::debug!(groups = report.groups.len(), "measured");

    match args.command {
        Command::Report => print_json(&report),
        Command::Length => {
            let config = Config::load(args.config.as_deref())?;
            let out = lengths(&report, config.as_ref());
            if args.json {
                return print_json(&out);
            }
            for (id, length) in &out.groups {
                println!("{id}: {length}");
            }
            println!("total: {}", out.total);
            Ok(())
        }
        Command::Size => {
            let config = Config::load(args.config.as_deref())?;
            let out = sizes(&report, config.as_ref());
            if args.json {
                return print_json(&out);
            }
            for (id, size) in &out {
                println!("{id}: width={} height={}", size.width, size.height);
            }
            Ok(())
        }
    }
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv)?;
    if args.help {
        print!("{}", usage());
        return Ok(());
    }
    run(args)?;
    Ok(())
}
