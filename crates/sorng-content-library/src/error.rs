//! Error types for the content library crate.

/// Categorised error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLibraryErrorKind {
    /// vSphere REST API unreachable or session expired
    ConnectionError,
    /// Authentication failed (401)
    AuthenticationError,
    /// Permission denied (403)
    AccessDenied,
    /// Library / item lookup yielded no match
    NotFound,
    /// A lookup by name matched more than one object
    Ambiguous,
    /// HTTP / API error with status code
    ApiError(u16),
    /// Timeout
    Timeout,
    /// JSON parse / deserialization error
    ParseError,
    /// The server reported a failed update session or file transfer
    UploadError,
    /// Resource configuration is missing or malformed
    InvalidConfig,
    /// Resource type name not served by this provider
    UnknownResource,
    /// Generic
    Other,
}

/// Crate error type carrying a kind + human-readable message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{kind:?}] {message}")]
pub struct ContentLibraryError {
    pub kind: ContentLibraryErrorKind,
    pub message: String,
}

impl ContentLibraryError {
    pub fn new(kind: ContentLibraryErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::ConnectionError, msg)
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::AuthenticationError, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::NotFound, msg)
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::Ambiguous, msg)
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::ApiError(status), msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::ParseError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::Timeout, msg)
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::UploadError, msg)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::InvalidConfig, msg)
    }

    pub fn unknown_resource(msg: impl Into<String>) -> Self {
        Self::new(ContentLibraryErrorKind::UnknownResource, msg)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ContentLibraryErrorKind::NotFound
    }
}

impl From<ContentLibraryError> for String {
    fn from(e: ContentLibraryError) -> String {
        e.to_string()
    }
}

impl From<reqwest::Error> for ContentLibraryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("HTTP timeout: {e}"))
        } else if e.is_connect() {
            Self::connection(format!("Connection failed: {e}"))
        } else {
            Self::new(ContentLibraryErrorKind::Other, format!("HTTP error: {e}"))
        }
    }
}

impl From<serde_json::Error> for ContentLibraryError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {e}"))
    }
}

/// Convenience alias.
pub type ContentLibraryResult<T> = Result<T, ContentLibraryError>;
