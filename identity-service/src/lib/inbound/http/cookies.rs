use auth::oauth::ROUND_TRIP_MAX_AGE_SECONDS;
use auth::oauth::STATE_COOKIE;
use auth::oauth::VERIFIER_COOKIE;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;

/// Path shared by the authorize and callback routes.
pub const ROUND_TRIP_PATH: &str = "/oauth";

fn round_trip_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(ROUND_TRIP_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ROUND_TRIP_MAX_AGE_SECONDS))
        .build()
}

/// Store the state nonce and PKCE verifier for the callback.
pub fn set_round_trip(jar: CookieJar, state: String, verifier: String, secure: bool) -> CookieJar {
    jar.add(round_trip_cookie(STATE_COOKIE, state, secure))
        .add(round_trip_cookie(VERIFIER_COOKIE, verifier, secure))
}

/// Expire both round-trip cookies.
pub fn clear_round_trip(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(STATE_COOKIE).path(ROUND_TRIP_PATH))
        .remove(Cookie::build(VERIFIER_COOKIE).path(ROUND_TRIP_PATH))
}

pub fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name).map(|cookie| cookie.value().to_string())
}
