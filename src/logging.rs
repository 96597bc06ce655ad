//! Console log sink.
//!
//! Every line reads `<YYYY/MM/DD HH:MM:SS> : [<LVL>] <message>` with the
//! local time, for example `2024/05/01 12:00:00 : [INF] Opened device: tun0`.

use std::fmt;

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Formats events as timestamped, severity-tagged lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} : [{}] ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_tag(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Three-letter severity tag.
pub fn level_tag(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERR",
        Level::WARN => "WRN",
        Level::INFO => "INF",
        Level::DEBUG => "DBG",
        Level::TRACE => "TRC",
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `default_filter`.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(LineFormat)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(&Level::INFO), "INF");
        assert_eq!(level_tag(&Level::WARN), "WRN");
        assert_eq!(level_tag(&Level::DEBUG), "DBG");
        assert_eq!(level_tag(&Level::ERROR), "ERR");
    }

    #[test]
    fn test_line_shape() {
        let (_, logs) = capture_logs(|| tracing::warn!("Nothing to read."));
        let line = logs.lines().next().unwrap();

        // "YYYY/MM/DD HH:MM:SS" is 19 characters
        let (timestamp, rest) = line.split_at(19);
        assert_eq!(rest, " : [WRN] Nothing to read.");
        assert_eq!(&timestamp[4..5], "/");
        assert_eq!(&timestamp[10..11], " ");
        assert!(timestamp[..4].chars().all(|c| c.is_ascii_digit()));
    }
}
