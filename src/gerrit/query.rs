//! Query string encoding for endpoint options
//!
//! Each options type lists its own query pairs; nothing is derived by
//! reflection. Only populated fields produce a pair.

use url::form_urlencoded;

/// An options record that can be sent as query parameters
pub trait QueryOptions {
    /// Key/value pairs for every populated field
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Append the encoded options to `path`
///
/// Pairs are sorted by key so the same options always produce the same URL.
/// `None`, or options with no populated field, leave `path` untouched.
pub fn add_options<O: QueryOptions>(path: &str, options: Option<&O>) -> String {
    let Some(options) = options else {
        return path.to_string();
    };

    let mut pairs = options.query_pairs();
    if pairs.is_empty() {
        return path.to_string();
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();

    format!("{}?{}", path, query)
}

/// Push `key=value` when `value` is set
pub(crate) fn push_opt<T: ToString>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&T>,
) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

/// Push `key=true` for an enabled flag
pub(crate) fn push_flag(pairs: &mut Vec<(&'static str, String)>, key: &'static str, flag: bool) {
    if flag {
        pairs.push((key, "true".to_string()));
    }
}
