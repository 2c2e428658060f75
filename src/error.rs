use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("Url error {0}")]
    Url(#[from] url::ParseError),

    #[error("Server answered {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Request was not accepted by the server")]
    Rejected,

    #[error("Not signed in")]
    MissingToken,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Checks done in the browser before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an image")]
    MissingImage,

    #[error("Image is still loading, try again in a moment")]
    ImageLoading,

    #[error("Please fill in the {0}")]
    MissingField(&'static str),
}

impl ApiError {
    /// Text for a transient notification: whatever the server said, else `fallback`.
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { detail, .. } if !detail.is_empty() => detail.clone(),
            ApiError::Validation(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Error body of the backend: `{"detail": "..."}` or a list of field issues.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Issues(Vec<Issue>),
}

#[derive(Debug, Deserialize)]
struct Issue {
    msg: String,
}

impl ErrorBody {
    pub fn into_detail(self) -> String {
        match self.detail {
            Detail::Text(text) => text,
            Detail::Issues(issues) => issues
                .into_iter()
                .map(|issue| issue.msg)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}
