//! Identifier splitting and token normalization

/// Split an identifier into lower-case subtokens
///
/// Boundaries are any non-alphabetic character (separators, digits, whitespace),
/// a lower-to-upper case change (`computeSum`), and the last capital of an
/// acronym followed by a lower-case letter (`HTTPServer` → `http`, `server`).
pub fn split_to_subtokens(token: &str) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    let mut subtokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphabetic() {
            flush(&mut current, &mut subtokens);
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                flush(&mut current, &mut subtokens);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut subtokens);
    subtokens
}

fn flush(current: &mut String, subtokens: &mut Vec<String>) {
    if !current.is_empty() {
        subtokens.push(current.to_lowercase());
        current.clear();
    }
}

/// Whether `token` is a placeholder such as `<STR>` or `<NUM>`
pub fn is_placeholder(token: &str) -> bool {
    token.len() > 2
        && token.starts_with('<')
        && token.ends_with('>')
        && token[1..token.len() - 1]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_')
}

/// Canonical form of a leaf token of node kind `kind`
///
/// Subtokens are joined with `|`. Tokens without any letters fall back to a
/// placeholder derived from the kind (`<INTEGER_LITERAL>`) or `<SYM>` for
/// operator kinds. Placeholders pass through unchanged, so the function is
/// idempotent.
pub fn normalize_token(kind: &str, token: &str) -> String {
    if is_placeholder(token) {
        return token.to_string();
    }
    let subtokens = split_to_subtokens(token);
    if !subtokens.is_empty() {
        return subtokens.join("|");
    }
    if !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("<{}>", kind.to_ascii_uppercase())
    } else {
        "<SYM>".to_string()
    }
}
