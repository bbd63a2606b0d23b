//! FROM-script handling: keyword stripping and alias extraction
//!
//! A source script names entities, not tables, and may bind aliases:
//!
//! ```text
//! FROM order o INNER JOIN orderItem i ON i.orderId = o.id
//! ```
//!
//! yields the alias map `{order: order, o: order, orderItem: orderItem, i: orderItem}`.

use std::collections::HashMap;

const JOIN_KEYWORDS: &[&str] = &[
    "FROM",
    "JOIN",
    "INNER",
    "LEFT",
    "RIGHT",
    "OUTER",
    "CROSS",
    "FULL",
    "NATURAL",
    "STRAIGHT_JOIN",
    "ON",
    "USING",
    "AND",
    "OR",
    "AS",
    "WHERE",
];

fn is_keyword(token: &str) -> bool {
    JOIN_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(token))
}

/// Plain identifier: letter or underscore, then alphanumerics/underscores
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Drop a redundant leading `FROM` keyword (any case)
pub fn strip_from_keyword(script: &str) -> &str {
    let trimmed = script.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) if first.eq_ignore_ascii_case("FROM") => rest.trim_start(),
        None if trimmed.eq_ignore_ascii_case("FROM") => "",
        _ => trimmed,
    }
}

fn tokenize(script: &str) -> Vec<String> {
    script
        .replace(',', " , ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Extract alias → entity bindings from a source script
pub fn parse_alias_map(script: &str) -> HashMap<String, String> {
    let tokens = tokenize(script);
    let mut aliases = HashMap::new();
    let mut expect_entity = true;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();

        if token == "," || token.eq_ignore_ascii_case("FROM") || token.eq_ignore_ascii_case("JOIN") {
            expect_entity = true;
            i += 1;
            continue;
        }

        if !expect_entity || is_keyword(token) || !is_identifier(token) {
            i += 1;
            continue;
        }

        let entity = token.to_string();
        aliases.insert(entity.clone(), entity.clone());
        expect_entity = false;
        i += 1;

        if tokens.get(i).is_some_and(|t| t.eq_ignore_ascii_case("AS")) {
            i += 1;
        }
        if let Some(alias) = tokens.get(i) {
            if !is_keyword(alias) && is_identifier(alias) {
                aliases.insert(alias.clone(), entity);
                i += 1;
            }
        }
    }

    aliases
}
