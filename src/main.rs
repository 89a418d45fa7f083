use clap::Parser;
use nwb_inspector::commands::{self, InspectOptions};
use nwb_inspector::core::error::{InspectorError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Inspect neurophysiology session files for best-practice and correctness issues
#[derive(Parser)]
#[command(name = "nwb-inspector")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Session file, or a folder of session files
  #[arg(required_unless_present = "list_checks")]
  path: Option<PathBuf>,

  /// Disable colored console output
  #[arg(long)]
  no_color: bool,

  /// Save the text report to this file
  #[arg(long)]
  report_file_path: Option<PathBuf>,

  /// Overwrite existing report files
  #[arg(short, long)]
  overwrite: bool,

  /// Comma-separated checks to skip
  #[arg(short, long, value_delimiter = ',')]
  ignore: Vec<String>,

  /// Comma-separated checks to run (all others are skipped)
  #[arg(short, long, value_delimiter = ',')]
  select: Vec<String>,

  /// Lowest importance to report: CRITICAL, BEST_PRACTICE_VIOLATION or BEST_PRACTICE_SUGGESTION
  #[arg(short, long)]
  threshold: Option<String>,

  /// TOML file of importance overrides (default: nwbinspector.toml next to PATH)
  #[arg(short, long)]
  config_path: Option<PathBuf>,

  /// Write every message as JSON to this file
  #[arg(short, long)]
  json_file_path: Option<PathBuf>,

  /// Number of files inspected in parallel (<= 0: one per CPU)
  #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
  n_jobs: i32,

  /// Comma-separated message attributes to group the report by
  #[arg(long, value_delimiter = ',', default_values = ["file", "importance"])]
  levels: Vec<String>,

  /// Comma-separated true/false per level: list that level in descending order
  #[arg(long, value_delimiter = ',')]
  reverse: Option<Vec<bool>>,

  /// List the checks that would run, then exit
  #[arg(long)]
  list_checks: bool,

  /// Log debug output to stderr
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn into_options(self) -> InspectOptions {
    InspectOptions {
      path: self.path.unwrap_or_else(|| PathBuf::from(".")),
      select: self.select,
      ignore: self.ignore,
      threshold: self.threshold,
      config_path: self.config_path,
      n_jobs: self.n_jobs,
      levels: self.levels,
      reverse: self.reverse,
      report_file_path: self.report_file_path,
      json_file_path: self.json_file_path,
      overwrite: self.overwrite,
      no_color: self.no_color,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr; `NWBINSPECTOR_LOG` sets the filter (default: warn)
fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_env("NWBINSPECTOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false),
    )
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);
  nwb_inspector::engine::install_panic_hook();

  let list_checks = cli.list_checks;
  let options = cli.into_options();
  let result = if list_checks {
    commands::run_list_checks(&options)
  } else {
    commands::run_inspect(options)
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: InspectorError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
