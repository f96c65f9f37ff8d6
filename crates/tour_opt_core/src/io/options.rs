use std::{env, path::Path};

use log::LevelFilter;
use tour_opt_derive::{CliOptions, CliValue};

use crate::strategy::{CohortConfig, DropoutConfig, RestartConfig};
use crate::{Error, Result};

/// Runtime options for a single optimization run.
#[derive(Clone, Debug, CliOptions)]
pub struct Options {
    /// Improvement strategy to run.
    #[cli(long = "strategy", parse_with = "StrategyKind::parse")]
    pub strategy: StrategyKind,
    /// Base seed for tour shuffling and dropout sampling.
    #[cli(long = "seed")]
    pub seed: u64,
    /// Independent random-restart hill climbs for the two-opt strategy.
    #[cli(long = "restarts")]
    pub restarts: usize,
    /// Dropout steps to run.
    #[cli(long = "iterations")]
    pub iterations: usize,
    /// A point is dropped when a draw from 0..=dropout-max falls below this.
    #[cli(long = "dropout-threshold")]
    pub dropout_threshold: u32,
    /// Upper bound of the dropout draw.
    #[cli(long = "dropout-max")]
    pub dropout_max: u32,
    /// Number of distinct tours kept by the cohort strategy.
    #[cli(long = "cohort-size")]
    pub cohort_size: usize,
    /// Cohort rounds, each adding one fresh local optimum.
    #[cli(long = "rounds")]
    pub rounds: usize,
    /// TSPLIB instance file. Empty or `-` reads stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Optional TSPLIB tour to start from instead of a shuffled tour.
    #[cli(long = "initial-tour")]
    pub initial_tour: String,
    /// Output TSPLIB tour file. Empty or `-` writes stdout.
    #[cli(long = "output")]
    pub output: String,
    /// Write the parsed instance back out in normalized TSPLIB form.
    #[cli(long = "instance-output")]
    pub instance_output: String,
    /// Log the MST edges no improving 2-opt move can keep.
    #[cli(long = "report-useless-edges")]
    pub report_useless_edges: bool,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp")]
    pub log_timestamp: bool,
    /// Optional log file. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "strategy")]
pub enum StrategyKind {
    #[cli(alias = "2-opt")]
    #[cli(alias = "restart")]
    TwoOpt,
    Dropout,
    Cohort,
    Scaffold,
    Buildup,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::TwoOpt,
            seed: 1,
            restarts: 8,
            iterations: 100,
            dropout_threshold: 20,
            dropout_max: 100,
            cohort_size: 50,
            rounds: 20,
            input: String::new(),
            initial_tour: String::new(),
            output: String::new(),
            instance_output: String::new(),
            report_useless_edges: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl Options {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };
            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dropout_threshold >= self.dropout_max {
            return Err(Error::invalid_input(format!(
                "dropout-threshold ({}) must be below dropout-max ({})",
                self.dropout_threshold, self.dropout_max
            )));
        }
        if self.restarts == 0 {
            return Err(Error::invalid_input("restarts must be > 0"));
        }
        if self.cohort_size == 0 {
            return Err(Error::invalid_input("cohort-size must be > 0"));
        }
        Ok(())
    }

    pub fn usage() -> String {
        format!(
            concat!(
                "Usage:\n",
                "  tour-opt [options] --input instance.tsp\n",
                "  tour-opt [options] < instance.tsp\n\n",
                "Options:\n",
                "{}",
                "  --help\n\n",
                "Strategies: {}\n\n",
                "Examples:\n",
                "  tour-opt --input a280.tsp --restarts 16 --output a280.tour\n",
                "  tour-opt --strategy dropout --iterations 500 --log-level info < a280.tsp\n",
                "  tour-opt --strategy scaffold --initial-tour a280.tour --input a280.tsp\n",
                "  tour-opt --strategy cohort --cohort-size 20 --rounds 50 --seed 7 < a280.tsp\n",
                "  tour-opt --report-useless-edges --log-level info --input a280.tsp\n",
            ),
            Self::option_lines(),
            StrategyKind::EXPECTED,
        )
    }

    pub fn restart_config(&self) -> RestartConfig {
        RestartConfig {
            restarts: self.restarts,
            seed: self.seed,
        }
    }

    pub fn dropout_config(&self) -> DropoutConfig {
        DropoutConfig {
            threshold: self.dropout_threshold,
            max_draw: self.dropout_max,
            iterations: self.iterations,
            seed: self.seed,
        }
    }

    pub fn cohort_config(&self) -> CohortConfig {
        CohortConfig {
            cohort_size: self.cohort_size,
            rounds: self.rounds,
            seed: self.seed,
        }
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }

    pub fn initial_tour_path(&self) -> Option<&Path> {
        non_stdio_path(&self.initial_tour)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn instance_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.instance_output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }
}

fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}
