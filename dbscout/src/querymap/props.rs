//! Properties-document parsing.
//!
//! `key=value` (or `key:value`) lines, `#`/`!` comments, backslash line
//! continuation, and a small escape set including `\uXXXX`.

use crate::errors::PropsError;

/// Parse a properties document into its key/value pairs, in document order.
///
/// Duplicate keys are preserved here; last-wins resolution is the merge
/// consumer's business.
pub fn parse(text: &str) -> Result<Vec<(String, String)>, PropsError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut pairs = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line_number = index + 1;
        let line = lines[index].trim_start();
        index += 1;

        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.get(index) {
                Some(next) => {
                    logical.push_str(next.trim_start());
                    index += 1;
                }
                // A continuation at end of document: the value simply ends.
                None => break,
            }
        }

        pairs.push(split_pair(&logical, line_number)?);
    }

    Ok(pairs)
}

/// An odd number of trailing backslashes marks a continuation.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_pair(logical: &str, line: usize) -> Result<(String, String), PropsError> {
    let mut separator = None;
    let mut escaped = false;
    for (at, ch) in logical.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                separator = Some(at);
                break;
            }
            _ => {}
        }
    }

    let Some(at) = separator else {
        return Err(PropsError::MissingSeparator { line });
    };

    let key = unescape(logical[..at].trim(), line)?;
    let value = unescape(logical[at + 1..].trim_start(), line)?;
    Ok((key, value))
}

fn unescape(raw: &str, line: usize) -> Result<String, PropsError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('=') => out.push('='),
            Some(':') => out.push(':'),
            Some('#') => out.push('#'),
            Some('!') => out.push('!'),
            Some(' ') => out.push(' '),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|c| c.to_digit(16))
                        .ok_or(PropsError::BadUnicodeEscape { line })?;
                    code = code * 16 + digit;
                }
                out.push(char::from_u32(code).ok_or(PropsError::BadUnicodeEscape { line })?);
            }
            Some(other) => return Err(PropsError::InvalidEscape { line, escape: other }),
            None => return Err(PropsError::InvalidEscape { line, escape: '\\' }),
        }
    }

    Ok(out)
}
