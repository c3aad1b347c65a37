//! Cache key policy for catalog reads.
//!
//! Equal parameters always produce equal keys and different parameters
//! always produce different keys. Absent and empty filters share the empty
//! placeholder; present values are escaped so `:` inside a value can never
//! be confused with a segment separator.

use std::borrow::Cow;

use serde_json::json;

use super::model::{ProductListQuery, SearchOptions};

/// Prefix shared by every listing and search key
pub const PRODUCTS_PREFIX: &str = "products:";

/// Key of a single product lookup, also the pattern that invalidates it.
pub fn product_key(id: i64) -> String {
    format!("product:{}", id)
}

/// Key of a paginated listing.
pub fn products_list_key(query: &ProductListQuery) -> String {
    format!(
        "{}page:{}:limit:{}:category:{}:search:{}:sort:{}",
        PRODUCTS_PREFIX,
        query.page,
        query.limit,
        optional_segment(query.category.as_deref()),
        optional_segment(query.search.as_deref()),
        query.sort_by.as_str(),
    )
}

/// Key of a free-text search. Options serialize last, as JSON.
pub fn products_search_key(query: &str, options: &SearchOptions) -> String {
    let options = json!({ "skip": options.skip, "take": options.take });
    format!("{}search:{}:{}", PRODUCTS_PREFIX, escape(query), options)
}

fn optional_segment(value: Option<&str>) -> Cow<'_, str> {
    match value {
        Some(v) if !v.is_empty() => escape(v),
        _ => Cow::Borrowed(""),
    }
}

fn escape(value: &str) -> Cow<'_, str> {
    if value.contains(['%', ':']) {
        Cow::Owned(value.replace('%', "%25").replace(':', "%3A"))
    } else {
        Cow::Borrowed(value)
    }
}
