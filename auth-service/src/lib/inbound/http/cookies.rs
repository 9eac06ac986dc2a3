use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;

/// Settings for the cookie carrying the refresh token.
///
/// The refresh token never appears in a response body; it lives only in an
/// `HttpOnly; SameSite=Strict` cookie scoped to `/`.
#[derive(Debug, Clone)]
pub struct RefreshCookie {
    name: String,
    secure: bool,
    max_age: chrono::Duration,
}

impl RefreshCookie {
    pub fn new(name: impl Into<String>, secure: bool, max_age: chrono::Duration) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(time::Duration::seconds(self.max_age.num_seconds()))
            .build()
    }

    /// Removal cookie matching the attributes of [`Self::issue`].
    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), ""))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .build()
    }

    pub fn read(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header;
    use axum::http::HeaderMap;

    use super::*;

    fn refresh_cookie() -> RefreshCookie {
        RefreshCookie::new("refresh_token", true, chrono::Duration::days(7))
    }

    #[test]
    fn test_issue_sets_hardened_attributes() {
        let cookie = refresh_cookie().issue("tok".to_string());
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("refresh_token=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
    }

    #[test]
    fn test_insecure_cookie_omits_secure_flag() {
        let cookie = RefreshCookie::new("refresh_token", false, chrono::Duration::minutes(5))
            .issue("tok".to_string());
        assert!(!cookie.to_string().contains("Secure"));
    }

    #[test]
    fn test_read_ignores_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "refresh_token=".parse().unwrap());
        assert_eq!(refresh_cookie().read(&CookieJar::from_headers(&headers)), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "refresh_token=abc".parse().unwrap());
        assert_eq!(
            refresh_cookie().read(&CookieJar::from_headers(&headers)),
            Some("abc".to_string())
        );
    }
}
