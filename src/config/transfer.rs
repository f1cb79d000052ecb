//! Transfer directives: which files of the shared home appear in the per-host
//! home, and how.
//!
//! ```text
//! L .ssh            # symlink
//! H .bash_history   # hard link
//! T .config/        # copy the contents with rsync
//! ```
//!
//! The type character must be in the first column; the path starts at the
//! third character and is relative to the shared home.
use std::fmt;
use std::path::Path;

use super::lines::{self, CommentStyle, Diagnostic, Line};

/// How a directive materialises its source in the per-host home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    /// `L`: symbolic link back to the shared home.
    SymLink,
    /// `H`: hard link to the shared file.
    HardLink,
    /// `T`: recursive copy through the sync tool.
    Copy,
}

impl TransferKind {
    /// Map a directive type character to its kind.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'L' => Some(Self::SymLink),
            'H' => Some(Self::HardLink),
            'T' => Some(Self::Copy),
            _ => None,
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SymLink => "symlink",
            Self::HardLink => "hard link",
            Self::Copy => "copy",
        };
        f.write_str(label)
    }
}

/// One parsed line of the transfer file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDirective {
    /// What to do with the path.
    pub kind: TransferKind,
    /// Path relative to the shared home, leading `/` removed.
    pub path: String,
    /// 1-based source line.
    pub line: usize,
}

/// Parse one meaningful line.
///
/// The result carries the directive (if the line is usable) and any
/// diagnostics; a leading `/` produces a warning but still yields a directive.
#[must_use]
pub fn parse_directive(file: &Path, line: Line<'_>) -> (Option<TransferDirective>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let text = line.text;

    if text.chars().count() < 3 {
        diagnostics.push(Diagnostic::new(
            file,
            line.number,
            format!("Invalid format: {text}"),
        ));
        return (None, diagnostics);
    }

    let Some(type_char) = text.chars().next() else {
        return (None, diagnostics);
    };
    let Some(kind) = TransferKind::from_char(type_char) else {
        diagnostics.push(Diagnostic::new(
            file,
            line.number,
            format!("Invalid type: {type_char}"),
        ));
        return (None, diagnostics);
    };

    let raw = text.get(type_char.len_utf8() + 1..).unwrap_or_default();
    let path = if let Some(stripped) = raw.strip_prefix('/') {
        diagnostics.push(Diagnostic::new(
            file,
            line.number,
            format!("Ignoring leading '/' in path: {raw}"),
        ));
        stripped
    } else {
        raw
    };

    if path.is_empty() {
        diagnostics.push(Diagnostic::new(file, line.number, "Empty path"));
        return (None, diagnostics);
    }
    if Path::new(path).file_name().is_none() {
        diagnostics.push(Diagnostic::new(
            file,
            line.number,
            format!("Path has no final component: {path}"),
        ));
        return (None, diagnostics);
    }

    let directive = TransferDirective {
        kind,
        path: path.to_string(),
        line: line.number,
    };
    (Some(directive), diagnostics)
}

/// Parse every directive in `content`, in file order.
#[must_use]
pub fn parse_directives_from_str(
    file: &Path,
    content: &str,
) -> (Vec<TransferDirective>, Vec<Diagnostic>) {
    let mut directives = Vec::new();
    let mut diagnostics = Vec::new();
    for line in lines::meaningful_lines(content, CommentStyle::FirstColumn) {
        let (directive, mut diags) = parse_directive(file, line);
        directives.extend(directive);
        diagnostics.append(&mut diags);
    }
    (directives, diagnostics)
}
