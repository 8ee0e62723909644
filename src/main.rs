//! @ai:module:intent CLI entry point for the TextGrid parser and checker
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on parser, check, config, output

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use textgrid_parser::{
    check, output, parse_str, CliConfig, Error, OutputFormat, ParseOptions, TextGridFormat,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textgrid")]
#[command(author, version, about = "Parse and check Praat TextGrid annotation files")]
struct Cli {
    /// TOML file with default format, output and checking options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a TextGrid file and print its tiers
    Parse {
        /// Path to the TextGrid file
        path: PathBuf,

        /// TextGrid syntax
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Verify interval tiling and point ordering
        #[arg(long)]
        check: bool,

        /// Output format
        #[arg(long, short, value_enum)]
        output: Option<Output>,
    },

    /// Check TextGrid files for structural and temporal consistency
    Check {
        /// Path to a TextGrid file or a directory to search
        #[arg(default_value = ".")]
        path: PathBuf,

        /// TextGrid syntax
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Output format
        #[arg(long, short, value_enum)]
        output: Option<Output>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Full,
    Short,
    Minimal,
    Auto,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for TextGridFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Full => TextGridFormat::Full,
            Format::Short | Format::Minimal => TextGridFormat::Short,
            Format::Auto => TextGridFormat::Auto,
        }
    }
}

impl From<Output> for OutputFormat {
    fn from(o: Output) -> Self {
        match o {
            Output::Text => OutputFormat::Text,
            Output::Json => OutputFormat::Json,
            Output::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

/// @ai:intent RUST_LOG when set, otherwise the `--verbose` default
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "textgrid_parser=debug"
    } else {
        "textgrid_parser=warn"
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(verbose))
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CliConfig> {
    match path {
        Some(path) => CliConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(CliConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match init_logging(cli.verbose).and_then(|_| load_config(cli.config.as_deref())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Parse {
            path,
            format,
            check,
            output,
        } => {
            let options = ParseOptions {
                check_consistency: check || config.check_consistency,
                format: format.map(Into::into).unwrap_or(config.format),
            };
            let out_format = output.map(Into::into).unwrap_or(config.output);

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error: {}", Error::FileRead { path, source: e });
                    return ExitCode::from(2);
                }
            };

            match parse_str(&content, &options) {
                Ok(grid) => {
                    println!("{}", output::format_textgrid(&grid, out_format));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}: {}", path.display(), output::render_error(&e, &content));
                    ExitCode::from(2)
                }
            }
        }

        Commands::Check {
            path,
            format,
            output,
        } => {
            let options = config
                .parse_options()
                .with_format(format.map(Into::into).unwrap_or(config.format));
            let out_format = output.map(Into::into).unwrap_or(config.output);

            let result = if path.is_file() {
                check::check_file(&path, &options)
            } else {
                check::check_directory(&path, &options)
            };

            match result {
                Ok(report) => {
                    println!("{}", output::format_check_report(&report, out_format));

                    if report.passed() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(1)
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
    }
}
