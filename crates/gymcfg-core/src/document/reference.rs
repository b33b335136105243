//! Interpolation references: `${...num_envs}` and `${resolve_default:128,${...num_envs}}`.
//!
//! Only two forms exist. A scoped path lookup names another key by walking
//! up from the mapping that declares the reference (one dot per level) or
//! from the root scope when written without dots. `resolve_default` takes a
//! literal default and a target that is either a path lookup or a literal.

use std::fmt;
use std::str::FromStr;

use crate::document::errors::ReferenceError;
use crate::document::value::{Value, parse_scalar};

const OPEN: &str = "${";
const CLOSE: char = '}';
const RESOLVE_DEFAULT: &str = "resolve_default";

/// A scoped path lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRef {
    /// Number of leading dots. Zero means absolute from the root scope.
    pub up: usize,
    pub keys: Vec<String>,
}

impl PathRef {
    pub fn is_absolute(&self) -> bool {
        self.up == 0
    }
}

impl fmt::Display for PathRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", OPEN, ".".repeat(self.up), self.keys.join("."))?;
        write!(f, "{}", CLOSE)
    }
}

/// Second argument of `resolve_default`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultTarget {
    Path(PathRef),
    Literal(Box<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Path(PathRef),
    ResolveDefault {
        default: Box<Value>,
        target: DefaultTarget,
    },
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Path(path) => path.fmt(f),
            Reference::ResolveDefault { default, target } => {
                write!(f, "{}{}:{},", OPEN, RESOLVE_DEFAULT, literal_text(default))?;
                match target {
                    DefaultTarget::Path(path) => path.fmt(f)?,
                    DefaultTarget::Literal(value) => f.write_str(&literal_text(value))?,
                }
                write!(f, "{}", CLOSE)
            }
        }
    }
}

/// Render a literal so that [`parse_scalar`] reads it back unchanged.
fn literal_text(value: &Value) -> String {
    match value {
        Value::Int(i) => i.to_string(),
        Value::Float(x) => format!("{:?}", x),
        Value::Bool(b) => b.to_string(),
        Value::Str(s) => {
            if matches!(parse_scalar(s), Value::Str(ref parsed) if parsed == s)
                && !s.contains([',', '}', '$'])
                && !s.is_empty()
            {
                s.clone()
            } else {
                format!("\"{}\"", s)
            }
        }
        other => other.kind().to_string(),
    }
}

/// True when `text` looks like it wants interpolation at all.
pub fn is_interpolation(text: &str) -> bool {
    text.contains(OPEN)
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let inner = strip_delimiters(text.trim())?;
        match inner.split_once(':') {
            Some((directive, args)) => parse_directive(directive.trim(), args),
            None => parse_path(inner).map(Reference::Path),
        }
    }
}

/// Remove the outer `${` and `}`, requiring that they enclose the whole text.
fn strip_delimiters(text: &str) -> Result<&str, ReferenceError> {
    if !text.starts_with(OPEN) || !text.ends_with(CLOSE) {
        return Err(ReferenceError::Malformed {
            reason: "a reference must be the entire value, written as ${...}".to_string(),
        });
    }
    if closing_index(text, 0) != Some(text.len() - 1) {
        return Err(ReferenceError::Malformed {
            reason: "embedded interpolation inside a string is not supported".to_string(),
        });
    }
    Ok(&text[OPEN.len()..text.len() - 1])
}

/// Index of the `}` that closes the `${` starting at `start`.
fn closing_index(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        if bytes[i..].starts_with(OPEN.as_bytes()) {
            depth += 1;
            i += OPEN.len();
            continue;
        }
        if bytes[i] == b'}' {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn parse_path(text: &str) -> Result<PathRef, ReferenceError> {
    let text = text.trim();
    let up = text.chars().take_while(|c| *c == '.').count();
    let rest = &text[up..];
    if rest.is_empty() {
        return Err(ReferenceError::Malformed {
            reason: "reference names no key".to_string(),
        });
    }
    let keys: Vec<String> = rest.split('.').map(str::to_string).collect();
    if let Some(bad) = keys.iter().find(|k| !is_valid_key(k)) {
        return Err(ReferenceError::Malformed {
            reason: format!("invalid key segment '{}'", bad),
        });
    }
    Ok(PathRef { up, keys })
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn parse_directive(directive: &str, args: &str) -> Result<Reference, ReferenceError> {
    if directive != RESOLVE_DEFAULT {
        return Err(ReferenceError::UnsupportedDirective {
            directive: directive.to_string(),
        });
    }
    let (default_text, target_text) =
        split_top_level_comma(args).ok_or_else(|| ReferenceError::Malformed {
            reason: "resolve_default takes exactly two arguments: DEFAULT,PATH".to_string(),
        })?;
    if split_top_level_comma(target_text).is_some() {
        return Err(ReferenceError::Malformed {
            reason: "resolve_default takes exactly two arguments: DEFAULT,PATH".to_string(),
        });
    }
    if is_interpolation(default_text) {
        return Err(ReferenceError::Malformed {
            reason: "the resolve_default fallback must be a literal".to_string(),
        });
    }
    let default = Box::new(parse_scalar(default_text));

    let target_text = target_text.trim();
    let target = if is_interpolation(target_text) {
        match target_text.parse::<Reference>()? {
            Reference::Path(path) => DefaultTarget::Path(path),
            Reference::ResolveDefault { .. } => {
                return Err(ReferenceError::Malformed {
                    reason: "nested resolve_default is not supported".to_string(),
                });
            }
        }
    } else {
        DefaultTarget::Literal(Box::new(parse_scalar(target_text)))
    };

    Ok(Reference::ResolveDefault { default, target })
}

/// Split at the first comma not nested inside `${...}`.
///
/// Scans bytes and only slices at the ASCII comma, which is always a char
/// boundary.
fn split_top_level_comma(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(OPEN.as_bytes()) {
            depth += 1;
            i += OPEN.len();
            continue;
        }
        match bytes[i] {
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
        i += 1;
    }
    None
}
