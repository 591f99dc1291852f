//! `@name` parameter token scanning.
//!
//! A token is `@` followed by one or more identifier characters
//! (`[A-Za-z0-9_$]` or any non-ASCII character). Tokens inside string literals,
//! quoted identifiers and comments are not parameters. An unterminated quote
//! or comment swallows the rest of the text.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use regex::Regex;

const SCAN_PATTERN: &str = concat!(
    r"'(?:[^']|'')*'?",
    r#"|"(?:[^"]|"")*"?"#,
    r"|`[^`]*`?",
    r"|\[[^\]]*\]?",
    r"|--[^\n]*",
    r"|/\*(?s:.*?)(?:\*/|\z)",
    r"|@((?:[A-Za-z0-9_$]|[^\x00-\x7F])+)",
);

fn scanner() -> &'static Regex {
    static SCANNER: OnceLock<Regex> = OnceLock::new();
    SCANNER.get_or_init(|| Regex::new(SCAN_PATTERN).expect("parameter scan pattern is valid"))
}

/// Scan `sql` for parameter names, without the `@` prefix.
///
/// Names are unique and listed in order of first appearance.
pub fn scan_parameters(sql: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in scanner().captures_iter(sql) {
        if let Some(name) = captures.get(1) {
            let name = name.as_str();
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Most distinct SQL texts the process-wide cache holds at once.
pub const PARAM_CACHE_CAPACITY: usize = 1024;

/// Cache of scan results keyed by SQL text.
///
/// Holds at most `capacity` texts. When full, the cache is emptied before the
/// next insert, so dynamically built statements cannot grow it without bound.
struct ParamCache {
    cache: RwLock<HashMap<String, Arc<[String]>>>,
    capacity: usize,
}

impl ParamCache {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn get_or_scan(&self, sql: &str) -> Arc<[String]> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(names) = cache.get(sql) {
                return Arc::clone(names);
            }
        }

        let names: Arc<[String]> = scan_parameters(sql).into();
        tracing::trace!(sql = sql, count = names.len(), "Scanned statement parameters");
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= self.capacity && !cache.contains_key(sql) {
            tracing::debug!(entries = cache.len(), "Parameter cache full, clearing");
            cache.clear();
        }
        Arc::clone(cache.entry(sql.to_string()).or_insert(names))
    }
}

fn param_cache() -> &'static ParamCache {
    static CACHE: OnceLock<ParamCache> = OnceLock::new();
    CACHE.get_or_init(|| ParamCache::with_capacity(PARAM_CACHE_CAPACITY))
}

/// Parameter names referenced by `sql`.
///
/// Results are cached per distinct text, up to [`PARAM_CACHE_CAPACITY`] texts.
pub fn parameter_names(sql: &str) -> Arc<[String]> {
    param_cache().get_or_scan(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_in_order_without_duplicates() {
        let names = scan_parameters("UPDATE T SET A = @A, B = @B WHERE X = @A OR Y = @b_2");
        assert_eq!(names, ["A", "B", "b_2"]);
    }

    #[test]
    fn test_token_ends_at_non_identifier() {
        assert_eq!(scan_parameters("SELECT * FROM t WHERE id=@id;"), ["id"]);
        assert_eq!(scan_parameters("VALUES (@a,@b)"), ["a", "b"]);
        assert_eq!(scan_parameters("WHERE x = @cost$ AND y = @prénom"), ["cost$", "prénom"]);
    }

    #[test]
    fn test_bare_at_is_not_a_token() {
        assert!(scan_parameters("SELECT '@' || @ FROM t").is_empty());
    }

    #[test]
    fn test_literals_and_comments_are_skipped() {
        let sql = r#"SELECT 'mail@host', "col@x", `b@q`, [w@z] -- @comment
            FROM t /* @block
            still comment */ WHERE a = @real AND s = 'it''s @not'"#;
        assert_eq!(scan_parameters(sql), ["real"]);
    }

    #[test]
    fn test_unterminated_quote_stops_scan() {
        assert_eq!(scan_parameters("SELECT @a, 'open @b"), ["a"]);
        assert_eq!(scan_parameters("SELECT @a /* open @b"), ["a"]);
    }

    #[test]
    fn test_cache_returns_same_scan() {
        let sql = "SELECT * FROM cached WHERE k = @k";
        let first = parameter_names(sql);
        let second = parameter_names(sql);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, ["k".to_string()]);
    }

    #[test]
    fn test_cache_stays_bounded() {
        let cache = ParamCache::with_capacity(4);
        for i in 0..100 {
            let names = cache.get_or_scan(&format!("SELECT * FROM t WHERE k IN ({i}, @id)"));
            assert_eq!(&*names, ["id".to_string()]);
            assert!(cache.len() <= 4);
        }

        let kept = cache.get_or_scan("SELECT * FROM t WHERE k IN (99, @id)");
        let again = cache.get_or_scan("SELECT * FROM t WHERE k IN (99, @id)");
        assert!(Arc::ptr_eq(&kept, &again));
    }
}
