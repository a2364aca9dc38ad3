use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::refresh_cookie_removal;

/// Drop the refresh cookie. Issued tokens remain valid until they expire.
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(refresh_cookie_removal()), StatusCode::NO_CONTENT)
}
