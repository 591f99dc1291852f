//! SQL identifier quoting.

/// Quote an identifier for SQLite with backticks.
///
/// Embedded backticks are doubled, so keywords and unusual spellings render
/// as plain identifiers.
pub fn quote_ident(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for ch in name.chars() {
        if ch == '`' {
            quoted.push('`');
        }
        quoted.push(ch);
    }
    quoted.push('`');
    quoted
}
