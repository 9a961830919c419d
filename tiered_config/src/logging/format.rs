//! Line formatters for the text and JSON styles.

use std::fmt::{self, Write as _};

use chrono::{Local, SecondsFormat};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::LogFormat;
use crate::LoggingConfig;

/// Formats one event per line, prefixed with the timestamp and level and
/// followed by the static fields of the logging section.
#[derive(Debug)]
pub(super) struct EventFormat {
    style: LogFormat,
    ts_format: String,
    quote_empty: bool,
    fields: Vec<(String, Value)>,
}

impl EventFormat {
    pub(super) fn new(style: LogFormat, config: &LoggingConfig) -> Self {
        Self {
            style,
            ts_format: config.ts_format.clone(),
            quote_empty: config.quote_empty_fields,
            fields: config
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    fn timestamp(&self) -> String {
        let now = Local::now();
        if self.ts_format.is_empty() {
            return now.to_rfc3339_opts(SecondsFormat::Millis, false);
        }
        let mut rendered = String::new();
        if write!(rendered, "{}", now.format(&self.ts_format)).is_err() {
            return now.to_rfc3339_opts(SecondsFormat::Millis, false);
        }
        rendered
    }

    fn write_text(
        &self,
        writer: &mut Writer<'_>,
        level: Level,
        event: FieldCollector,
    ) -> fmt::Result {
        write!(writer, "time=")?;
        self.write_text_value(writer, &self.timestamp())?;
        let name = level_name(level);
        if writer.has_ansi_escapes() {
            write!(writer, " level=\x1b[{}m{name}\x1b[0m", level_color(level))?;
        } else {
            write!(writer, " level={name}")?;
        }
        write!(writer, " msg=")?;
        self.write_text_value(writer, event.message.as_deref().unwrap_or_default())?;
        for (key, value) in self.fields.iter().chain(event.fields.iter()) {
            write!(writer, " {key}=")?;
            match value {
                Value::String(text) => self.write_text_value(writer, text)?,
                other => self.write_text_value(writer, &other.to_string())?,
            }
        }
        writeln!(writer)
    }

    fn write_text_value(&self, writer: &mut Writer<'_>, value: &str) -> fmt::Result {
        if needs_quoting(value, self.quote_empty) {
            write!(writer, "{value:?}")
        } else {
            writer.write_str(value)
        }
    }

    fn write_json(
        &self,
        writer: &mut Writer<'_>,
        level: Level,
        event: FieldCollector,
    ) -> fmt::Result {
        let mut line = Map::new();
        line.insert("time".to_owned(), Value::String(self.timestamp()));
        line.insert(
            "level".to_owned(),
            Value::String(level_name(level).to_owned()),
        );
        line.insert(
            "msg".to_owned(),
            Value::String(event.message.unwrap_or_default()),
        );
        for (key, value) in self.fields.iter().cloned().chain(event.fields) {
            line.insert(key, value);
        }
        let rendered = serde_json::to_string(&Value::Object(line)).map_err(|_| fmt::Error)?;
        writeln!(writer, "{rendered}")
    }
}

impl<S, N> FormatEvent<S, N> for EventFormat
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
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        let level = *event.metadata().level();
        match self.style {
            LogFormat::Text => self.write_text(&mut writer, level, collector),
            LogFormat::Json => self.write_json(&mut writer, level, collector),
        }
    }
}

/// Gathers an event's message and fields in recording order.
#[derive(Debug, Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, Value)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::String(value.to_owned()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, Value::String(format!("{value:?}")));
    }
}

const fn level_name(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warning",
        Level::ERROR => "error",
    }
}

const fn level_color(level: Level) -> u8 {
    match level {
        Level::TRACE | Level::DEBUG => 37,
        Level::INFO => 36,
        Level::WARN => 33,
        Level::ERROR => 31,
    }
}

/// Whether a logfmt value must be wrapped in quotes.
fn needs_quoting(value: &str, quote_empty: bool) -> bool {
    if value.is_empty() {
        return quote_empty;
    }
    !value.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+')
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::needs_quoting;

    #[rstest]
    #[case("plain", true, false)]
    #[case("a/b@c-d.e_f^g+h", true, false)]
    #[case("two words", true, true)]
    #[case("key=value", true, true)]
    #[case("2024-01-01T00:00:00Z", true, true)]
    #[case("", true, true)]
    #[case("", false, false)]
    fn quoting(#[case] value: &str, #[case] quote_empty: bool, #[case] expected: bool) {
        assert_eq!(needs_quoting(value, quote_empty), expected);
    }
}
