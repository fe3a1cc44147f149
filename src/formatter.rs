//! Log line layout: `<time> f<frame> <LEVEL> <target>: <fields>`.
//!
//! ```text
//! 12:04:31.01234 f00418  INFO reelspin::systems::spin: Spin started reels=3 longest=2.1s
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Frames run by every machine in this process, as shown in log lines.
static FRAME: AtomicU64 = AtomicU64::new(0);

/// Frame numbers roll over after five decimal digits.
const FRAME_WRAP: u64 = 100_000;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

const DIM: &str = "\x1b[2m";

/// Formats events as single lines prefixed with the wall-clock time and the machine frame.
pub struct FrameFormatter;

impl<S, N> FormatEvent<S, N> for FrameFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let ansi = writer.has_ansi_escapes();
        let meta = event.metadata();
        let stamp = OffsetDateTime::now_utc().format(TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        let (color, label) = level_style(meta.level());

        write!(
            writer,
            "{} {} {} {} ",
            Painted::new(ansi, DIM, stamp),
            Painted::new(ansi, DIM, format_args!("f{:05}", frame_count() % FRAME_WRAP)),
            Painted::new(ansi, color, label),
            Painted::new(ansi, DIM, format_args!("{}:", meta.target())),
        )?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// ANSI color and right-aligned label for a level.
fn level_style(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::ERROR => ("\x1b[31m", "ERROR"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::TRACE => ("\x1b[35m", "TRACE"),
    }
}

/// A value wrapped in an escape sequence, or shown as-is when the writer has no ANSI support.
struct Painted<T> {
    code: Option<&'static str>,
    value: T,
}

impl<T> Painted<T> {
    fn new(ansi: bool, code: &'static str, value: T) -> Self {
        Self {
            code: ansi.then_some(code),
            value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code}{}\x1b[0m", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Advances the frame shown in log lines. Called once per machine frame.
pub fn increment_tick() {
    FRAME.fetch_add(1, Ordering::Relaxed);
}

pub fn frame_count() -> u64 {
    FRAME.load(Ordering::Relaxed)
}
