use std::fmt;

use chrono::Local;
use nu_ansi_term::{Color, Style};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter,
};

const LOGS_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "depined";

/// Target that marks an info event as a success line.
pub const SUCCESS_TARGET: &str = "success";

/// Emits an info event rendered with the `SUCCESS` label.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: $crate::logger::SUCCESS_TARGET, $($arg)*)
    };
}

pub fn init_default_logger() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(LOGS_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .event_format(LineFormatter { ansi: true })
        .with_filter(env_filter());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(LineFormatter { ansi: false })
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn label(event: &Event<'_>) -> (&'static str, Color) {
    let metadata = event.metadata();

    if metadata.target() == SUCCESS_TARGET {
        return ("SUCCESS", Color::LightGreen);
    }

    match *metadata.level() {
        Level::ERROR => ("ERROR", Color::LightRed),
        Level::WARN => ("WARN", Color::Yellow),
        Level::INFO => ("INFO", Color::LightCyan),
        Level::DEBUG => ("DEBUG", Color::Purple),
        Level::TRACE => ("TRACE", Color::DarkGray),
    }
}

/// `[timestamp] [LEVEL] message`, colored on the console.
struct LineFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let (level, color) = label(event);

        let mut msg_visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut msg_visitor);

        if self.ansi {
            let dim = Style::new().dimmed();
            let tag = Style::new().fg(color).bold();
            writeln!(
                writer,
                "{} {} {}",
                dim.paint(format!("[{timestamp}]")),
                tag.paint(format!("[{level}]")),
                msg_visitor.message
            )
        } else {
            writeln!(writer, "[{timestamp}] [{level}] {}", msg_visitor.message)
        }
    }
}
