// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use serde::Serialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use submax_cli::{BenchmarkConfig, BenchmarkReport, run_benchmark};
use submax_core::SubmaxError;
use submax_io::{Dataset, ReadOptions, read_arff, read_csv};

#[derive(Debug)]
enum CliError {
    Submax(SubmaxError),
    Io {
        context: String,
        source: std::io::Error,
    },
    Json {
        context: String,
        source: serde_json::Error,
    },
    InvalidInput(String),
}

impl CliError {
    fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Submax(SubmaxError::InvalidInput(_)) | Self::InvalidInput(_) => "invalid_input",
            Self::Submax(SubmaxError::NonSpd(_)) => "non_spd",
            Self::Submax(SubmaxError::NotSupported(_)) => "not_supported",
            Self::Submax(SubmaxError::NumericalIssue(_)) => "numerical_issue",
            Self::Submax(SubmaxError::ResourceLimit(_)) => "resource_limit",
            Self::Io { .. } => "io_error",
            Self::Json { .. } => "json_error",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submax(err) => write!(f, "{err}"),
            Self::Io { context, source } => write!(f, "{context}: {source}"),
            Self::Json { context, source } => write!(f, "{context}: {source}"),
            Self::InvalidInput(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Submax(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<SubmaxError> for CliError {
    fn from(value: SubmaxError) -> Self {
        Self::Submax(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputFormat {
    Arff,
    Csv,
}

impl InputFormat {
    fn parse(raw: &str) -> Result<Self, CliError> {
        match raw {
            "arff" => Ok(Self::Arff),
            "csv" => Ok(Self::Csv),
            other => Err(CliError::invalid_input(format!(
                "unknown input format '{other}'; expected 'arff' or 'csv'"
            ))),
        }
    }

    fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Self::Csv,
            _ => Self::Arff,
        }
    }
}

#[derive(Debug)]
struct RunArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<InputFormat>,
    max_fields: Option<usize>,
    config: BenchmarkConfig,
    epsilons_explicit: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            format: None,
            max_fields: ReadOptions::default().max_fields,
            config: BenchmarkConfig {
                epsilons: vec![],
                ..BenchmarkConfig::default()
            },
            epsilons_explicit: false,
        }
    }
}

#[derive(Serialize)]
struct InputSummary {
    path: String,
    format: &'static str,
    n: usize,
    d: usize,
    dropped_rows: usize,
}

#[derive(Serialize)]
struct RunOutput {
    command: &'static str,
    input: InputSummary,
    report: BenchmarkReport,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

const USAGE: &str = "\
submax - submodular subset selection benchmark driver

USAGE:
    submax run --input <path> [options]

OPTIONS:
    --input <path>         dataset to read (required)
    --format <arff|csv>    input format (default: inferred from extension)
    --max-fields <n>       retain at most n leading fields per row (default: 41)
    --k <n>                cardinality budget (default: 5)
    --sigma <x>            IVM regularization sigma (default: 1)
    --kernel-sigma <x>     RBF sigma (default: sqrt of the dimensionality)
    --kernel-scale <x>     RBF scale (default: 1)
    --m <x>                singleton upper bound for streaming (default: 1)
    --epsilon <x>          threshold grid accuracy; repeatable
                           (default: 0.01 0.02 0.05 0.1)
    --seed <n>             seed for the random baseline (default: 0)
    --output <path>        write the JSON report here instead of stdout
    -h, --help             print this help
    -V, --version          print the version";

fn main() {
    if let Err(err) = run() {
        emit_structured_error(&err);
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let Some(args) = parse_cli_from_env()? else {
        return Ok(());
    };
    handle_run(args)
}

fn parse_cli_from_env() -> Result<Option<RunArgs>, CliError> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help") {
        println!("{USAGE}");
        return Ok(None);
    }
    if matches!(args[0].as_str(), "-V" | "--version") {
        println!("submax {}", env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }
    if args[0] != "run" {
        return Err(CliError::invalid_input(format!(
            "unknown command '{}'; expected 'run'",
            args[0]
        )));
    }

    let rest = &args[1..];
    if rest
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        println!("{USAGE}");
        return Ok(None);
    }

    parse_run_args(rest).map(Some)
}

fn take_flag_value(
    flag: &str,
    tokens: &[String],
    idx: &mut usize,
) -> Result<String, CliError> {
    *idx += 1;
    tokens.get(*idx).cloned().ok_or_else(|| {
        CliError::invalid_input(format!("option '{flag}' requires a value"))
    })
}

fn parse_f64_arg(raw: &str, flag: &str) -> Result<f64, CliError> {
    raw.parse::<f64>()
        .map_err(|_| CliError::invalid_input(format!("option '{flag}' expects a number; got '{raw}'")))
}

fn parse_usize_arg(raw: &str, flag: &str) -> Result<usize, CliError> {
    raw.parse::<usize>()
        .map_err(|_| CliError::invalid_input(format!("option '{flag}' expects an integer; got '{raw}'")))
}

fn parse_u64_arg(raw: &str, flag: &str) -> Result<u64, CliError> {
    raw.parse::<u64>()
        .map_err(|_| CliError::invalid_input(format!("option '{flag}' expects an integer; got '{raw}'")))
}

fn parse_run_args(tokens: &[String]) -> Result<RunArgs, CliError> {
    let mut args = RunArgs::default();
    let mut idx = 0usize;

    while idx < tokens.len() {
        let flag = tokens[idx].as_str();
        match flag {
            "--input" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.input = PathBuf::from(raw);
            }
            "--output" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.output = Some(PathBuf::from(raw));
            }
            "--format" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.format = Some(InputFormat::parse(raw.as_str())?);
            }
            "--max-fields" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.max_fields = Some(parse_usize_arg(raw.as_str(), flag)?);
            }
            "--k" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.k = parse_usize_arg(raw.as_str(), flag)?;
            }
            "--sigma" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.sigma = parse_f64_arg(raw.as_str(), flag)?;
            }
            "--kernel-sigma" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.kernel_sigma = Some(parse_f64_arg(raw.as_str(), flag)?);
            }
            "--kernel-scale" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.kernel_scale = parse_f64_arg(raw.as_str(), flag)?;
            }
            "--m" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.singleton_bound = parse_f64_arg(raw.as_str(), flag)?;
            }
            "--epsilon" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.epsilons.push(parse_f64_arg(raw.as_str(), flag)?);
                args.epsilons_explicit = true;
            }
            "--seed" => {
                let raw = take_flag_value(flag, tokens, &mut idx)?;
                args.config.seed = parse_u64_arg(raw.as_str(), flag)?;
            }
            other => {
                return Err(CliError::invalid_input(format!(
                    "unknown run option '{other}'"
                )));
            }
        }
        idx += 1;
    }

    if args.input.as_os_str().is_empty() {
        return Err(CliError::invalid_input("option '--input' is required"));
    }
    if !args.epsilons_explicit {
        args.config.epsilons = BenchmarkConfig::default().epsilons;
    }
    Ok(args)
}

fn load_dataset(args: &RunArgs) -> Result<(Dataset, &'static str), CliError> {
    let options = ReadOptions {
        max_fields: args.max_fields,
    };
    let format = args.format.unwrap_or_else(|| InputFormat::infer(&args.input));
    let dataset = match format {
        InputFormat::Arff => read_arff(&args.input, &options)?,
        InputFormat::Csv => read_csv(&args.input, &options)?,
    };
    let label = match format {
        InputFormat::Arff => "arff",
        InputFormat::Csv => "csv",
    };
    Ok((dataset, label))
}

fn handle_run(args: RunArgs) -> Result<(), CliError> {
    let (dataset, format) = load_dataset(&args)?;
    for warning in &dataset.warnings {
        eprintln!("warning: {warning}");
    }

    let dropped_rows = dataset.warnings.len();
    let report = run_benchmark(&dataset.items, dataset.warnings.clone(), &args.config)?;

    let output = RunOutput {
        command: "run",
        input: InputSummary {
            path: args.input.display().to_string(),
            format,
            n: report.n,
            d: report.d,
            dropped_rows,
        },
        report,
    };

    write_json_output(&output, args.output.as_deref())
}

fn write_json_output<T: Serialize>(payload: &T, output_path: Option<&Path>) -> Result<(), CliError> {
    let encoded = serde_json::to_string_pretty(payload)
        .map_err(|source| CliError::json("failed to serialize JSON output", source))?;

    if let Some(path) = output_path {
        fs::write(path, format!("{encoded}\n"))
            .map_err(|source| CliError::io(format!("failed to write '{}'", path.display()), source))
    } else {
        println!("{encoded}");
        Ok(())
    }
}

fn emit_structured_error(err: &CliError) {
    let envelope = ErrorEnvelope {
        error: ErrorPayload {
            code: err.code().to_string(),
            message: err.to_string(),
        },
    };

    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!(
            "{{\"error\":{{\"code\":\"{}\",\"message\":\"{}\"}}}}",
            err.code(),
            err
        ),
    }
}
