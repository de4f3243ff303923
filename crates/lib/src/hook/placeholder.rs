//! Placeholder substitution in declared run-environment values.
//!
//! # Placeholder Formats
//!
//! - `$${prefix}` - the package's install prefix
//! - `$${name}` - the package name
//! - `$${version}` - the package version
//! - `$${hash}` - the package's DAG hash
//!
//! Single `$` characters pass through unchanged, so `$HOME` stays a shell
//! variable. Use `$$$` before `{` to produce a literal `$${`.
//!
//! # Example
//!
//! ```
//! use pkgenv_lib::hook::placeholder::{parse, Placeholder, Segment};
//!
//! let segments = parse("$${prefix}/bin:$HOME").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Prefix),
//!     Segment::Literal("/bin:$HOME".to_string()),
//! ]);
//! ```

use thiserror::Error;

use crate::spec::Spec;

/// A parsed placeholder reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
  Prefix,
  Name,
  Version,
  Hash,
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A placeholder to be resolved
  Placeholder(Placeholder),
}

/// Errors that can occur during placeholder parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown placeholder: {0}")]
  Unknown(String),
}

/// Parse a string containing placeholders into segments.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        chars.next();

        match chars.peek() {
          Some((_, '$')) => {
            chars.next();
            if let Some((_, '{')) = chars.peek() {
              // $$${ -> literal $${
              literal.push_str("$${");
              chars.next();
            } else {
              literal.push_str("$$$");
            }
          }
          Some((_, '{')) => {
            chars.next();

            if !literal.is_empty() {
              segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }

            let mut content = String::new();
            let mut found_close = false;
            for (_, c) in chars.by_ref() {
              if c == '}' {
                found_close = true;
                break;
              }
              content.push(c);
            }

            if !found_close {
              return Err(PlaceholderError::Unclosed(pos));
            }

            segments.push(Segment::Placeholder(parse_placeholder_content(&content)?));
          }
          _ => literal.push_str("$$"),
        }
      }
      _ => literal.push('$'),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

fn parse_placeholder_content(content: &str) -> Result<Placeholder, PlaceholderError> {
  match content {
    "prefix" => Ok(Placeholder::Prefix),
    "name" => Ok(Placeholder::Name),
    "version" => Ok(Placeholder::Version),
    "hash" => Ok(Placeholder::Hash),
    other => Err(PlaceholderError::Unknown(other.to_string())),
  }
}

/// Substitute every placeholder in `input` with values from `spec`.
pub fn substitute(input: &str, spec: &Spec) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in parse(input)? {
    match segment {
      Segment::Literal(s) => result.push_str(&s),
      Segment::Placeholder(Placeholder::Prefix) => result.push_str(&spec.prefix.to_string_lossy()),
      Segment::Placeholder(Placeholder::Name) => result.push_str(&spec.name),
      Segment::Placeholder(Placeholder::Version) => result.push_str(&spec.version),
      Segment::Placeholder(Placeholder::Hash) => result.push_str(spec.hash.as_str()),
    }
  }

  Ok(result)
}
