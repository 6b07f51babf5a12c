// rmatch - flag or join student rosters exported as messy CSV

mod exit_codes;
mod inspect;
mod roster;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use rostermatch_io::{DetectOptions, LoadError};
use rostermatch_recon::config::{DEFAULT_FLAG_OUTPUT, DEFAULT_JOIN_OUTPUT};
use rostermatch_recon::model::DEFAULT_FLAG_COLUMN;
use rostermatch_recon::ReconError;

use exit_codes::{load_exit_code, recon_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};

#[derive(Parser)]
#[command(name = "rmatch")]
#[command(about = "Match student rosters across messy CSV exports")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    detect: DetectArgs,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Delimiter detection tuning shared by every command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub(crate) struct DetectArgs {
    /// Bytes sampled for delimiter sniffing [default: 1024]
    #[arg(long, global = true)]
    sample_size: Option<usize>,

    /// Lines scanned by the delimiter frequency fallback [default: 10]
    #[arg(long, global = true)]
    fallback_lines: Option<usize>,
}

impl DetectArgs {
    /// Apply the flags on top of `base`, rejecting zero values.
    pub(crate) fn over(self, base: DetectOptions) -> Result<DetectOptions, CliError> {
        if self.sample_size == Some(0) {
            return Err(CliError::args("--sample-size must be greater than 0"));
        }
        if self.fallback_lines == Some(0) {
            return Err(CliError::args("--fallback-lines must be greater than 0"));
        }
        Ok(DetectOptions {
            sample_size: self.sample_size.unwrap_or(base.sample_size),
            fallback_lines: self.fallback_lines.unwrap_or(base.fallback_lines),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Mark every subject row that also appears in the reference roster
    #[command(after_help = "\
Examples:
  rmatch flag district.csv sped.csv
  rmatch flag district.csv sped.csv -o flagged.csv --flag-column isspecialed
  rmatch flag district.csv sped.csv --json")]
    Flag {
        /// Roster whose rows are flagged
        subject: PathBuf,

        /// Roster checked for membership
        reference: PathBuf,

        /// Output file
        #[arg(long, short = 'o', default_value = DEFAULT_FLAG_OUTPUT)]
        output: PathBuf,

        /// Name of the boolean column added to the output
        #[arg(long, default_value = DEFAULT_FLAG_COLUMN)]
        flag_column: String,

        /// Let blank names or dates match other blanks
        #[arg(long)]
        match_nulls: bool,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Write one row per subject/reference pair with equal keys
    #[command(after_help = "\
Examples:
  rmatch join district.csv sped.csv
  rmatch join district.csv sped.csv -o matched.csv")]
    Join {
        /// Left-hand roster
        subject: PathBuf,

        /// Right-hand roster
        reference: PathBuf,

        /// Output file
        #[arg(long, short = 'o', default_value = DEFAULT_JOIN_OUTPUT)]
        output: PathBuf,

        /// Let blank names or dates match other blanks
        #[arg(long)]
        match_nulls: bool,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Run a job described by a TOML file
    #[command(after_help = "\
Examples:
  rmatch run sped-check.match.toml
  rmatch run sped-check.match.toml --json
  rmatch run sped-check.match.toml -o /tmp/out.csv")]
    Run {
        /// Path to the job file
        config: PathBuf,

        /// Override the job's output path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a job file without running it
    Validate {
        /// Path to the job file
        config: PathBuf,
    },

    /// Show detected encoding, delimiter and header line of a file
    Detect {
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the derived first_name, last_name and dob for each row
    Normalize {
        file: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let detect = cli.detect;
    let result = match cli.command {
        Commands::Flag { subject, reference, output, flag_column, match_nulls, json } => {
            roster::cmd_flag(subject, reference, output, flag_column, match_nulls, json, detect)
        }
        Commands::Join { subject, reference, output, match_nulls, json } => {
            roster::cmd_join(subject, reference, output, match_nulls, json, detect)
        }
        Commands::Run { config, output, json } => roster::cmd_run(config, output, json, detect),
        Commands::Validate { config } => roster::cmd_validate(config),
        Commands::Detect { file, json } => inspect::cmd_detect(file, json, detect),
        Commands::Normalize { file, output } => inspect::cmd_normalize(file, output, detect),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    /// Create error from a load failure with the matching exit code.
    pub fn load(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::HeaderNotFound { .. } => Some(
                "the header line must mention a name (name, firstname/lastname) and a date of birth (dob, date of birth, birthdate)"
                    .to_string(),
            ),
            LoadError::Decode { .. } => Some("re-save the file as UTF-8 and retry".to_string()),
            _ => None,
        };
        Self { code: load_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn recon(err: ReconError) -> Self {
        Self { code: recon_exit_code(&err), message: err.to_string(), hint: None }
    }
}
