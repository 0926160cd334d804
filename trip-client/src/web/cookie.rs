//! The session cookie.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::cache::BrowserSession;

use super::state::AppState;

pub const SESSION_COOKIE: &str = "trip_session";

/// The session cookie value from a request, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// The `Set-Cookie` value that hands a browser its session token.
fn session_cookie(token: &str) -> Option<HeaderValue> {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// A request's browser session, plus the cookie to send back if a new
/// token was issued.
pub struct Browser {
    pub session: BrowserSession,
    set_cookie: Option<HeaderValue>,
}

impl Browser {
    pub async fn resolve(state: &AppState, headers: &HeaderMap) -> Self {
        let token = session_token(headers);
        let (session, issued) = state.sessions.get_or_create(token.as_deref()).await;
        let set_cookie = issued.then(|| session_cookie(session.token())).flatten();
        Self {
            session,
            set_cookie,
        }
    }

    /// Attach the session cookie, when one was issued, to a response.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Some(cookie) = &self.set_cookie {
            response
                .headers_mut()
                .append(header::SET_COOKIE, cookie.clone());
        }
        response
    }
}
