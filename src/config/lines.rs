//! Line-oriented reading shared by the host-group and transfer parsers.
//!
//! Both formats are deliberately tiny: one record per line, `#` comments,
//! and diagnostics reported as `<file>:<line>: <message>`.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// A recoverable problem found on one line of a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// File the line came from.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// What is wrong with the line.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic for `line` of `file`.
    #[must_use]
    pub fn new(file: &Path, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file.display(), self.line, self.message)
    }
}

/// Which lines count as full-line comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `#` must be the very first character.
    FirstColumn,
    /// `#` may follow leading whitespace.
    Indented,
}

/// One meaningful line: comments stripped, blank lines already skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Content with any inline comment and trailing blanks removed.
    pub text: &'a str,
}

/// Iterate over the meaningful lines of `content`.
///
/// Blank lines and full-line comments (per `style`) are skipped; inline
/// comments are cut with [`strip_inline_comment`]. Under
/// [`CommentStyle::Indented`] a line that is empty once the comment is gone
/// is skipped too. Under [`CommentStyle::FirstColumn`] it is yielded with
/// empty text, so the parser reports the misplaced comment.
pub fn meaningful_lines(content: &str, style: CommentStyle) -> impl Iterator<Item = Line<'_>> {
    content
        .lines()
        .enumerate()
        .filter_map(move |(idx, raw)| {
            if raw.trim().is_empty() || is_comment(raw, style) {
                return None;
            }
            let text = strip_inline_comment(raw);
            if style == CommentStyle::Indented && text.trim().is_empty() {
                return None;
            }
            Some(Line {
                number: idx + 1,
                text,
            })
        })
}

fn is_comment(raw: &str, style: CommentStyle) -> bool {
    match style {
        CommentStyle::FirstColumn => raw.starts_with('#'),
        CommentStyle::Indented => raw.trim_start().starts_with('#'),
    }
}

/// Cut `line` at its first `#` and drop the blank run before it.
///
/// Trailing whitespace (including a stray `\r`) is removed even when there
/// is no comment.
///
/// # Examples
///
/// ```
/// use multihome::config::lines::strip_inline_comment;
///
/// assert_eq!(strip_inline_comment("L .ssh   # keys"), "L .ssh");
/// assert_eq!(strip_inline_comment("L .ssh"), "L .ssh");
/// ```
#[must_use]
pub fn strip_inline_comment(line: &str) -> &str {
    let code = line.split_once('#').map_or(line, |(code, _)| code);
    code.trim_end()
}

/// Text of a config file, with its undecodable lines already reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigText {
    /// Decoded content. A line that is not valid UTF-8 is left empty so the
    /// numbering of the lines after it is unchanged.
    pub content: String,
    /// One diagnostic per line that is not valid UTF-8.
    pub diagnostics: Vec<Diagnostic>,
}

/// Read a config file, treating a missing file as empty.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read.
pub fn read_config(path: &Path) -> Result<ConfigText, ConfigError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(decode_lines(path, &bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ConfigText::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn decode_lines(path: &Path, bytes: &[u8]) -> ConfigText {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return ConfigText {
            content: content.to_string(),
            diagnostics: Vec::new(),
        };
    }

    let mut text = ConfigText::default();
    for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        if idx > 0 {
            text.content.push('\n');
        }
        match std::str::from_utf8(raw) {
            Ok(line) => text.content.push_str(line),
            Err(_) => text.diagnostics.push(Diagnostic::new(
                path,
                idx + 1,
                format!("Invalid UTF-8: {}", String::from_utf8_lossy(raw).trim_end()),
            )),
        }
    }
    text
}
