use std::time::Duration;
use url::Url;

static API_URL: Option<&'static str> = option_env!("LEND_A_HAND_API_URL");
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Key of the session token in `localStorage`.
pub const TOKEN_KEY: &str = "token";

/// Worst-case delay before a counterpart's message shows up in an open chat.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// Where the backend lives. Every endpoint hangs off `<base>/api`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base: Url,
}

impl ApiConfig {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        // Keep a trailing slash off so segments are appended, never replaced.
        if let Ok(mut segments) = base.path_segments_mut() {
            segments.pop_if_empty();
        }
        Ok(Self { base })
    }

    pub fn from_env() -> Result<Self, url::ParseError> {
        Self::new(API_URL.unwrap_or(DEFAULT_API_URL))
    }

    /// `<base>/api/<segments...>` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.push("api").extend(segments);
        }
        url
    }

    pub fn endpoint_with_query(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut().extend_pairs(query);
        url
    }
}
