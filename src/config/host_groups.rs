//! Host-group rules: map a hostname onto a shared logical identity.
//!
//! Format, one rule per line, evaluated top to bottom:
//!
//! ```text
//! # pattern        = replacement
//! ^compute[0-9]+   = compute   # all compute nodes share one home
//! ^login           = login
//! ```
//!
//! The first rule whose pattern matches the short hostname wins; later rules
//! are never parsed.
use std::path::Path;

use regex::Regex;

use super::layout::check_home_name;
use super::lines::{self, CommentStyle, Diagnostic, Line};
use crate::error::ConfigError;

/// A parsed `pattern = replacement` rule.
#[derive(Debug, Clone)]
pub struct HostGroupRule {
    /// Compiled pattern, matched anywhere in the hostname.
    pub pattern: Regex,
    /// Name used instead of the hostname when the pattern matches.
    pub replacement: String,
    /// 1-based source line.
    pub line: usize,
}

impl HostGroupRule {
    /// Whether this rule applies to `hostname`.
    #[must_use]
    pub fn matches(&self, hostname: &str) -> bool {
        self.pattern.is_match(hostname)
    }
}

/// The identity a machine ends up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Node name with the domain part removed.
    pub short_hostname: String,
    /// Name used to build the per-host home.
    pub resolved: String,
    /// Whether a host-group rule produced `resolved`.
    pub matched: bool,
}

impl ResolvedIdentity {
    /// Identity of a host no rule applies to.
    #[must_use]
    pub fn unmatched(short_hostname: &str) -> Self {
        Self {
            short_hostname: short_hostname.to_string(),
            resolved: short_hostname.to_string(),
            matched: false,
        }
    }
}

/// Outcome of resolving a hostname against a rule file.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The resolved identity.
    pub identity: ResolvedIdentity,
    /// Problems found on the lines that were read.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse one meaningful line into a rule.
///
/// # Errors
///
/// Returns a [`Diagnostic`] for a missing `=`, an empty field, a replacement
/// that is not a usable directory name (see [`check_home_name`]), or a
/// pattern that does not compile.
pub fn parse_rule(file: &Path, line: Line<'_>) -> Result<HostGroupRule, Diagnostic> {
    let Some((pattern, replacement)) = line.text.split_once('=') else {
        return Err(Diagnostic::new(
            file,
            line.number,
            format!("Invalid format (expected 'pattern = replacement'): {}", line.text),
        ));
    };
    let pattern = pattern.trim();
    let replacement = replacement.trim();

    if pattern.is_empty() {
        return Err(Diagnostic::new(file, line.number, "Empty pattern"));
    }
    if replacement.is_empty() {
        return Err(Diagnostic::new(
            file,
            line.number,
            format!("Empty replacement for pattern: {pattern}"),
        ));
    }
    if let Err(reason) = check_home_name(replacement) {
        return Err(Diagnostic::new(
            file,
            line.number,
            format!("Invalid replacement for pattern {pattern}: {reason}"),
        ));
    }

    let compiled = Regex::new(pattern).map_err(|e| {
        Diagnostic::new(
            file,
            line.number,
            format!("Invalid pattern '{pattern}': {}", first_line(&e.to_string())),
        )
    })?;

    Ok(HostGroupRule {
        pattern: compiled,
        replacement: replacement.to_string(),
        line: line.number,
    })
}

/// Parse every rule in `content`, collecting diagnostics for bad lines.
///
/// Unlike [`resolve_from_str`] this does not stop at a match; it is meant for
/// validating a whole file.
#[must_use]
pub fn parse_rules_from_str(file: &Path, content: &str) -> (Vec<HostGroupRule>, Vec<Diagnostic>) {
    let mut rules = Vec::new();
    let mut diagnostics = Vec::new();
    for line in lines::meaningful_lines(content, CommentStyle::Indented) {
        match parse_rule(file, line) {
            Ok(rule) => rules.push(rule),
            Err(d) => diagnostics.push(d),
        }
    }
    (rules, diagnostics)
}

/// Resolve `short_hostname` against the rules in `content`.
///
/// Lines are parsed lazily in order. A malformed line is reported and
/// skipped; the first matching rule ends the scan.
#[must_use]
pub fn resolve_from_str(short_hostname: &str, file: &Path, content: &str) -> Resolution {
    let mut identity = ResolvedIdentity::unmatched(short_hostname);
    let mut diagnostics = Vec::new();

    for line in lines::meaningful_lines(content, CommentStyle::Indented) {
        match parse_rule(file, line) {
            Ok(rule) if rule.matches(&identity.resolved) => {
                identity.resolved = rule.replacement;
                identity.matched = true;
                break;
            }
            Ok(_) => {}
            Err(d) => diagnostics.push(d),
        }
    }

    Resolution {
        identity,
        diagnostics,
    }
}

/// Resolve `short_hostname` against the rule file at `path`.
///
/// A missing file means no rules: the hostname resolves to itself. Lines
/// that are not valid UTF-8 are reported and skipped.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read.
pub fn resolve_host_identity(short_hostname: &str, path: &Path) -> Result<Resolution, ConfigError> {
    let text = lines::read_config(path)?;
    let mut resolution = resolve_from_str(short_hostname, path, &text.content);
    let mut diagnostics = text.diagnostics;
    diagnostics.append(&mut resolution.diagnostics);
    resolution.diagnostics = diagnostics;
    Ok(resolution)
}

/// Regex errors are multi-line with a caret diagram; keep the summary.
fn first_line(message: &str) -> &str {
    message
        .lines()
        .rev()
        .find(|l| l.starts_with("error:"))
        .or_else(|| message.lines().next())
        .unwrap_or(message)
}
