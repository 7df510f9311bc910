//! Output formatter for human-readable and JSON output
//!
//! The [`Formatter`] decides where a message goes and how it is marked.
//! The free functions render adapter results into the lines the commands
//! print in human mode.

use anon_core::{BucketInfo, ListObjectsInfo, ObjectInfo};
use jiff::Timestamp;
use serde::Serialize;

use super::OutputConfig;

/// Mark placed in front of a one-line status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Done,
    Failed,
    Warning,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Done => "✓",
            Status::Failed => "✗",
            Status::Warning => "⚠",
        }
    }

    /// ANSI foreground color code
    fn color(self) -> u8 {
        match self {
            Status::Done => 32,
            Status::Failed => 31,
            Status::Warning => 33,
        }
    }
}

#[derive(Serialize)]
struct ErrorOutput<'a> {
    error: &'a str,
}

/// Formatter for CLI output
///
/// In JSON mode stdout carries only JSON documents and status lines other
/// than errors are dropped.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Report a completed action on stdout
    pub fn success(&self, message: &str) {
        if self.chatter_allowed() {
            println!("{}", self.status_line(Status::Done, message));
        }
    }

    /// Report a failure on stderr, even in quiet mode
    pub fn error(&self, message: &str) {
        let line = if self.config.json {
            render_json(&ErrorOutput { error: message }).unwrap_or_else(|_| message.to_string())
        } else {
            self.status_line(Status::Failed, message)
        };
        eprintln!("{line}");
    }

    /// Report something the user should notice on stderr
    pub fn warning(&self, message: &str) {
        if self.chatter_allowed() {
            eprintln!("{}", self.status_line(Status::Warning, message));
        }
    }

    /// Print a value as pretty JSON on stdout
    pub fn json<T: Serialize>(&self, value: &T) {
        match render_json(value) {
            Ok(json) => println!("{json}"),
            Err(e) => self.error(&format!("Error serializing output: {e}")),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if !self.config.quiet {
            println!("{message}");
        }
    }

    fn chatter_allowed(&self) -> bool {
        !self.config.quiet && !self.config.json
    }

    fn status_line(&self, status: Status, message: &str) -> String {
        if self.colors_enabled() {
            format!("\x1b[{}m{}\x1b[0m {message}", status.color(), status.symbol())
        } else {
            format!("{} {message}", status.symbol())
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Human-readable size; negative sizes are unknown
pub fn format_size(size: i64) -> String {
    if size < 0 {
        return "?".to_string();
    }
    humansize::format_size(size as u64, humansize::BINARY)
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, or padding of the same width
pub fn format_timestamp(ts: Option<Timestamp>) -> String {
    match ts {
        Some(ts) => ts.strftime("%Y-%m-%d %H:%M:%S").to_string(),
        None => " ".repeat(19),
    }
}

/// One line per common prefix, then one per object
pub fn listing_lines(listing: &ListObjectsInfo) -> Vec<String> {
    let prefixes = listing
        .prefixes
        .iter()
        .map(|prefix| format!("[{}] {:>9} {prefix}", format_timestamp(None), "PRE"));
    let objects = listing.objects.iter().map(|object| {
        format!(
            "[{}] {:>9} {}",
            format_timestamp(object.mod_time),
            format_size(object.size),
            object.name
        )
    });
    prefixes.chain(objects).collect()
}

/// Hint shown after a truncated page, `None` when the listing is complete
pub fn continuation_hint(listing: &ListObjectsInfo) -> Option<String> {
    if !listing.is_truncated {
        return None;
    }
    Some(match &listing.next_marker {
        Some(marker) => format!("More entries available, continue with --marker '{marker}'"),
        None => "More entries available".to_string(),
    })
}

/// Labelled metadata lines for a single object
pub fn stat_lines(info: &ObjectInfo) -> Vec<String> {
    let mut fields: Vec<(&str, String)> = vec![("Name", info.name.clone())];
    if info.mod_time.is_some() {
        fields.push(("Date", format!("{} UTC", format_timestamp(info.mod_time))));
    }
    fields.push((
        "Size",
        format!("{} ({} bytes)", format_size(info.size), info.size),
    ));
    let optional = [
        ("ETag", &info.etag),
        ("Type", &info.content_type),
        ("Encoding", &info.content_encoding),
        ("Class", &info.storage_class),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            fields.push((label, value.clone()));
        }
    }

    let mut metadata: Vec<_> = info.user_defined.iter().collect();
    metadata.sort();
    fields.extend(
        metadata
            .into_iter()
            .map(|(name, value)| ("Metadata", format!("{name}={value}"))),
    );

    fields
        .into_iter()
        .map(|(label, value)| format!("{label:<10}: {value}"))
        .collect()
}

/// Creation date and bucket name
pub fn bucket_line(info: &BucketInfo) -> String {
    format!("[{}] {}/", format_timestamp(Some(info.created)), info.name)
}
