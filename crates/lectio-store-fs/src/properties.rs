//! Java-compatible `.properties` codec.
//!
//! Reader pipeline:
//!   raw &str
//!     └─ logical_lines()   → joins `\`-continued natural lines, drops
//!                            comments and blanks
//!          └─ split_entry() → (raw key, raw value)
//!               └─ unescape() → Properties
//!
//! The writer emits a comment header followed by one `key=value` line per
//! entry in key order. Keys escape `=`, `:` and spaces, so verse keys such as
//! `43:3:16` are written as `43\:3\:16` and read back unchanged.

use lectio_core::storage::Properties;

// ─── Reading ─────────────────────────────────────────────────────────────────

fn is_blank(c: char) -> bool { matches!(c, ' ' | '\t' | '\x0c') }

/// Whether `line` ends in an odd number of backslashes, i.e. continues onto
/// the next natural line.
fn continues(line: &str) -> bool {
  line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn logical_lines(input: &str) -> Vec<String> {
  let mut lines = Vec::new();
  let mut natural = input.lines();

  while let Some(raw) = natural.next() {
    let line = raw.trim_start_matches(is_blank);
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
      continue;
    }

    let mut logical = line.to_string();
    while continues(&logical) {
      logical.pop();
      match natural.next() {
        Some(next) => logical.push_str(next.trim_start_matches(is_blank)),
        None => break,
      }
    }
    lines.push(logical);
  }

  lines
}

/// Split a logical line at the first unescaped separator (`=`, `:` or
/// whitespace), skipping the separator and the whitespace around it.
fn split_entry(line: &str) -> (&str, &str) {
  let mut escaped = false;
  let mut key_end = line.len();
  for (i, c) in line.char_indices() {
    if escaped {
      escaped = false;
      continue;
    }
    match c {
      '\\' => escaped = true,
      '=' | ':' => {
        key_end = i;
        break;
      }
      c if is_blank(c) => {
        key_end = i;
        break;
      }
      _ => {}
    }
  }

  let key = &line[..key_end];
  let mut rest = line[key_end..].trim_start_matches(is_blank);
  if let Some(stripped) = rest.strip_prefix(['=', ':']) {
    rest = stripped.trim_start_matches(is_blank);
  }
  (key, rest)
}

fn unescape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut chars = s.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      Some('t') => out.push('\t'),
      Some('n') => out.push('\n'),
      Some('r') => out.push('\r'),
      Some('f') => out.push('\x0c'),
      Some('u') => {
        let hex: String = chars.by_ref().take(4).collect();
        let unit = u32::from_str_radix(&hex, 16).ok();
        let decoded = match unit {
          Some(high @ 0xD800..=0xDBFF) => {
            let mut ahead = chars.clone();
            let low = match (ahead.next(), ahead.next()) {
              (Some('\\'), Some('u')) => {
                let hex: String = ahead.by_ref().take(4).collect();
                u32::from_str_radix(&hex, 16).ok()
              }
              _ => None,
            };
            match low {
              Some(low @ 0xDC00..=0xDFFF) => {
                chars = ahead;
                char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
              }
              // Lone high surrogate.
              _ => None,
            }
          }
          unit => unit.and_then(char::from_u32),
        };
        match decoded {
          Some(decoded) => out.push(decoded),
          // Malformed escape: keep the text rather than lose it.
          None => {
            out.push_str("\\u");
            out.push_str(&hex);
          }
        }
      }
      Some(other) => out.push(other),
      None => {}
    }
  }
  out
}

/// Parse `.properties` text. Later duplicates of a key replace earlier ones.
pub fn parse(input: &str) -> Properties {
  logical_lines(input)
    .iter()
    .map(|line| {
      let (key, value) = split_entry(line);
      (unescape(key), unescape(value))
    })
    .collect()
}

// ─── Writing ─────────────────────────────────────────────────────────────────

fn escape(s: &str, is_key: bool) -> String {
  let mut out = String::with_capacity(s.len());
  for (i, c) in s.chars().enumerate() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\t' => out.push_str("\\t"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\x0c' => out.push_str("\\f"),
      '=' | ':' | '#' | '!' => {
        out.push('\\');
        out.push(c);
      }
      ' ' if is_key || i == 0 => out.push_str("\\ "),
      c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
      c => out.push(c),
    }
  }
  out
}

/// Render `properties` with each line of `comment` as a `#` header line.
pub fn write(properties: &Properties, comment: &str) -> String {
  let mut out = String::new();
  for line in comment.lines() {
    out.push('#');
    out.push_str(line);
    out.push('\n');
  }
  for (key, value) in properties {
    out.push_str(&escape(key, true));
    out.push('=');
    out.push_str(&escape(value, false));
    out.push('\n');
  }
  out
}
