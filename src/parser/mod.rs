use tracing::debug;

use crate::error::GenError;
use crate::synthesizer::ast::*;

pub mod source;

const INDEXED: &str = "indexed";

/// Parses a manifest event signature such as
/// `Transfer(indexed address from, indexed address to, uint256 value)`.
pub fn parse_event_signature(signature: &str) -> Result<EventModel, GenError> {
    let malformed = |reason: &str| GenError::malformed(signature, reason);

    let open = signature
        .find('(')
        .ok_or_else(|| malformed("missing parameter list"))?;
    let name = signature[..open].trim();
    if name.is_empty() {
        return Err(malformed("empty event name"));
    }

    let close = matching_paren(signature, open).ok_or_else(|| malformed("unbalanced parentheses"))?;
    if !signature[close + 1..].trim().is_empty() {
        return Err(malformed("unexpected text after parameter list"));
    }

    let parameters = parse_parameter_list(&signature[open + 1..close], true).map_err(malformed)?;
    debug!(event = name, parameters = parameters.len(), "Parsed event signature");

    Ok(EventModel {
        name: name.to_string(),
        parameters,
    })
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas that are not nested inside parentheses. Empty pieces
/// are dropped.
fn split_top_level(list: &str) -> Result<Vec<&str>, &'static str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    parts.push(list[start..].trim());

    Ok(parts.into_iter().filter(|p| !p.is_empty()).collect())
}

fn parse_parameter_list(list: &str, top_level: bool) -> Result<Vec<EventParameter>, &'static str> {
    split_top_level(list)?
        .into_iter()
        .enumerate()
        .map(|(position, token)| parse_parameter(token, position, top_level))
        .collect()
}

fn parse_parameter(
    token: &str,
    position: usize,
    top_level: bool,
) -> Result<EventParameter, &'static str> {
    let (mut indexed, rest) = strip_indexed(token);

    let (raw_type, kind, rest) = if rest.starts_with('(') {
        let close = matching_paren(rest, 0).ok_or("unbalanced parentheses")?;
        let type_end = rest[close + 1..]
            .find(char::is_whitespace)
            .map_or(rest.len(), |i| close + 1 + i);
        let interior = &rest[1..close];

        let kind = if interior.contains(',') {
            ParamKind::Tuple {
                fields: parse_parameter_list(interior, false)?,
                suffix: rest[close + 1..type_end].to_string(),
            }
        } else {
            ParamKind::Scalar
        };
        (&rest[..type_end], kind, &rest[type_end..])
    } else {
        let mut words = rest.splitn(2, char::is_whitespace);
        let ty = words.next().unwrap_or_default();
        (ty, ParamKind::Scalar, words.next().unwrap_or_default())
    };

    if raw_type.is_empty() {
        return Err("missing parameter type");
    }

    // Solidity puts `indexed` between type and name; manifests put it first.
    let mut name = None;
    for word in rest.split_whitespace() {
        if word == INDEXED && name.is_none() {
            indexed = true;
        } else {
            name = Some(word);
        }
    }

    Ok(EventParameter {
        name: name.map_or_else(|| format!("arg{}", position), str::to_string),
        raw_type: raw_type.to_string(),
        indexed: indexed && top_level,
        kind,
    })
}

fn strip_indexed(token: &str) -> (bool, &str) {
    match token.strip_prefix(INDEXED) {
        Some(rest) if rest.starts_with(|c: char| c.is_whitespace() || c == '(') => {
            (true, rest.trim_start())
        }
        _ => (false, token),
    }
}
