//! Credential resolution: which bearer token does this request carry?
//!
//! A request may present a token in up to three places. Exactly one is
//! trusted, by fixed priority, so conflicting tokens have one well-defined
//! outcome:
//!
//! 1. `Authorization: Bearer <token>` header — the standards-compliant,
//!    cache-safe transport.
//! 2. The `jwt` cookie — for top-level navigation where attaching a
//!    header is inconvenient.
//! 3. The `token` query parameter — last resort; query strings leak into
//!    access logs and browser history.
//!
//! Resolution never validates the token; it only picks the string handed
//! to [`Crypto::decode`](crate::Crypto::decode).

use fd_core::BEARER;

/// Picks at most one candidate token from the three credential sources.
/// A present-but-malformed `Authorization` header counts as absent and
/// falls through. The fallback sources are logged when used.
pub fn resolve(header: Option<&str>, cookie: Option<&str>, query: Option<&str>) -> Option<String> {
    if let Some(token) = header.and_then(bearer) {
        return Some(token.to_string());
    }
    if let Some(token) = cookie.filter(|t| !t.is_empty()) {
        log::warn!("bearer token taken from cookie fallback");
        return Some(token.to_string());
    }
    if let Some(token) = query.filter(|t| !t.is_empty()) {
        log::warn!("bearer token taken from query-string fallback");
        return Some(token.to_string());
    }
    None
}

fn bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Pulls the three credential sources out of an inbound request.
#[cfg(feature = "server")]
pub fn from_request(req: &actix_web::HttpRequest) -> Option<String> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);
    let cookie = req
        .cookie(fd_core::TOKEN_COOKIE)
        .map(|c| c.value().to_owned());
    let query = actix_web::web::Query::<std::collections::HashMap<String, String>>::from_query(
        req.query_string(),
    )
    .ok()
    .and_then(|q| q.get(fd_core::TOKEN_QUERY).cloned());
    resolve(header.as_deref(), cookie.as_deref(), query.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_wins_over_everything() {
        let found = resolve(Some("Bearer aaa"), Some("bbb"), Some("ccc"));
        assert_eq!(found.as_deref(), Some("aaa"));
    }

    #[test]
    fn cookie_wins_over_query() {
        let found = resolve(None, Some("bbb"), Some("ccc"));
        assert_eq!(found.as_deref(), Some("bbb"));
    }

    #[test]
    fn query_is_last_resort() {
        let found = resolve(None, None, Some("ccc"));
        assert_eq!(found.as_deref(), Some("ccc"));
    }

    #[test]
    fn nothing_yields_nothing() {
        assert_eq!(resolve(None, None, None), None);
    }

    #[test]
    fn malformed_header_falls_through() {
        let found = resolve(Some("Basic dXNlcjpwYXNz"), Some("bbb"), None);
        assert_eq!(found.as_deref(), Some("bbb"));
        let found = resolve(Some("Bearer "), None, Some("ccc"));
        assert_eq!(found.as_deref(), Some("ccc"));
    }

    #[test]
    fn empty_fallbacks_ignored() {
        assert_eq!(resolve(None, Some(""), Some("")), None);
    }
}
