use std::{env, fs::File, io::Write};

use env_logger::{Builder, Target, fmt::Formatter};
use log::Level;

use crate::options::{LogFormat, Options};
use crate::{Error, Result};

/// Per-module filter directives (`env_logger` syntax) layered on top of
/// `--log-level`, e.g. `tour_opt_core::algo=trace`.
pub const LOG_FILTER_ENV: &str = "TOUR_OPT_LOG";

pub fn init_logger(options: &Options) -> Result<()> {
    let mut builder = configure(options, env::var(LOG_FILTER_ENV).ok().as_deref());

    if let Some(log_path) = options.log_output_path() {
        let log_file = File::create(log_path).map_err(|e| {
            Error::other(format!(
                "failed to create log output file {}: {e}",
                log_path.display()
            ))
        })?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn configure(options: &Options, filters: Option<&str>) -> Builder {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            let tag = level_tag(record.level());
            match log_format {
                LogFormat::Compact => writeln!(buf, "{tag} {}", record.args()),
                LogFormat::Pretty => {
                    writeln!(buf, "{tag} [{}] {}", short_target(record.target()), record.args())
                }
            }
        });
    if let Some(filters) = filters.map(str::trim).filter(|f| !f.is_empty()) {
        builder.parse_filters(filters);
    }
    builder
}

/// Drops the crate prefix so pretty lines read `[algo::two_opt]`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("tour_opt_core::")
        .unwrap_or(target)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::{configure, level_tag, short_target};
    use crate::options::{LogLevel, Options};

    #[test]
    fn level_tag_is_upper_case_level_name() {
        assert_eq!(level_tag(Level::Error), "ERROR");
        assert_eq!(level_tag(Level::Warn), "WARN");
        assert_eq!(level_tag(Level::Trace), "TRACE");
    }

    #[test]
    fn short_target_strips_core_prefix_only() {
        assert_eq!(short_target("tour_opt_core::algo::kmove"), "algo::kmove");
        assert_eq!(short_target("tour_opt"), "tour_opt");
    }

    #[test]
    fn configure_accepts_extra_filters() {
        let options = Options {
            log_level: LogLevel::Warn,
            ..Options::default()
        };
        let logger = configure(&options, Some("tour_opt_core::algo=trace")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Trace);

        let logger = configure(&options, Some("  ")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Warn);
    }
}
