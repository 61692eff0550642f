//! Token extraction utilities.

/// Cookie a product sets after receiving a cross-token on its landing URL.
pub const CROSS_TOKEN_COOKIE: &str = "sincla_cross_token";

/// Trait for accessing HTTP headers in a framework-agnostic way.
///
/// # Example
///
/// ```rust,ignore
/// use sincla_sdk::Headers;
///
/// struct AxumHeaders<'a>(&'a axum::http::HeaderMap);
///
/// impl Headers for AxumHeaders<'_> {
///     fn get_authorization(&self) -> Option<&str> {
///         self.0.get("authorization").and_then(|v| v.to_str().ok())
///     }
///
///     fn get_cookie(&self) -> Option<&str> {
///         self.0.get("cookie").and_then(|v| v.to_str().ok())
///     }
/// }
/// ```
pub trait Headers {
    /// Get the Authorization header value.
    fn get_authorization(&self) -> Option<&str>;

    /// Get the Cookie header value.
    fn get_cookie(&self) -> Option<&str>;
}

/// Extract token from an Authorization Bearer header.
pub fn extract_from_header(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extract the cross-token cookie from a Cookie header.
///
/// JWTs only contain URL-safe characters, so the value is taken verbatim.
pub fn extract_from_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CROSS_TOKEN_COOKIE)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
