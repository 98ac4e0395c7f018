//! Ad-hoc copy specifications
//!
//! The `copy` parameter is a space-delimited list of `source>destination`
//! specs. A spec may be wrapped in double quotes as a whole so that either
//! side can contain spaces: `"my dir/a.txt>out dir/a.txt"`.

use crate::error::{Error, Result};

/// A copy spec as written, before any path resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    pub source: String,
    pub destination: String,
}

/// Parse a full `copy` parameter value into its specs
pub fn parse_copy_specs(value: &str) -> Result<Vec<CopySpec>> {
    tokenize(value)?.iter().map(|t| parse_spec(t)).collect()
}

/// Split a value on whitespace, keeping double-quoted units together
pub fn tokenize(value: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = value.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return Err(Error::Config(format!(
                    "unbalanced quotes in copy spec: \"{}",
                    token
                )));
            }
            if let Some(&next) = chars.peek() {
                if !next.is_whitespace() {
                    return Err(Error::Config(format!(
                        "unexpected '{}' after quoted copy spec \"{}\"",
                        next, token
                    )));
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                if c == '"' {
                    return Err(Error::Config(format!(
                        "unbalanced quotes in copy spec: {}\"",
                        token
                    )));
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// Parse a single `source>destination` token
pub fn parse_spec(token: &str) -> Result<CopySpec> {
    if token.chars().count() < 3 {
        return Err(Error::Config(format!(
            "copy spec '{}' is too short, expected 'source>destination'",
            token
        )));
    }

    let mut parts = token.split('>');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(source), Some(destination), None)
            if !source.trim().is_empty() && !destination.trim().is_empty() =>
        {
            Ok(CopySpec {
                source: source.trim().to_string(),
                destination: destination.trim().to_string(),
            })
        }
        _ => Err(Error::Config(format!(
            "copy spec '{}' must contain a single '>' between source and destination",
            token
        ))),
    }
}
