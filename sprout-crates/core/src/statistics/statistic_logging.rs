//! Responsible for writing statistics as `{PREFIX} {NAME}={VALUE}` lines, optionally followed by a
//! closing line.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistics are written.
pub struct StatisticOptions {
    /// Printed in front of every statistic line.
    prefix: &'static str,
    /// A closing line which is printed after a block of statistics.
    postfix: Option<&'static str>,
    /// The casing applied to the statistic names.
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Enables the logging of statistics.
///
/// Statistics are only written once this has been called; later calls have no effect. When no
/// writer is given, statistics go to stdout.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix,
            postfix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

fn with_options(action: impl FnOnce(&mut StatisticOptions)) {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = options.lock() {
            action(&mut options);
        }
    }
}

/// Logs the statistic `name` with the given `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| {
        let name = match options.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };

        let prefix = options.prefix;
        let _ = writeln!(options.writer, "{prefix} {name}={value}");
    });
}

/// Logs the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    with_options(|options| {
        if let Some(postfix) = options.postfix {
            let _ = writeln!(options.writer, "{postfix}");
        }
    });
}

/// Returns whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
