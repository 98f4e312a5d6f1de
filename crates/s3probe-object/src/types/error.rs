//! Error type for object storage operations.
//!
//! Storage service failures keep whatever the provider reported: the HTTP
//! status and the S3 error code (`NoSuchBucket`, `AccessDenied`, ...). Both
//! are recovered from the [`object_store::Error`] variant and its source chain.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for object storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

static STATUS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:status code:|with status)\s+(\d{3})").expect("valid status pattern")
});

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Code>([^<]+)</Code>").expect("valid code pattern"));

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The storage service rejected or failed a request.
    Service,
    /// The disk configuration cannot produce a working client.
    Configuration,
    /// Anything the storage service did not report.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => f.write_str("service"),
            Self::Configuration => f.write_str("configuration"),
            Self::Unexpected => f.write_str("unexpected"),
        }
    }
}

/// An object storage error carrying a message, its [`ErrorKind`], the
/// provider error code and HTTP status when known, and an optional source.
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    status: Option<u16>,
    source: Option<BoxedError>,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl fmt::Display, label: &str) -> Self {
        Self {
            kind,
            message: format!("[{label}] {msg}"),
            code: None,
            status: None,
            source: None,
        }
    }

    /// Create a storage service error formatted as `[{label}] {msg}`.
    pub fn service(msg: impl fmt::Display, label: &str) -> Self {
        Self::new(ErrorKind::Service, msg, label)
    }

    /// Create a configuration error formatted as `[{label}] {msg}`.
    pub fn configuration(msg: impl fmt::Display, label: &str) -> Self {
        Self::new(ErrorKind::Configuration, msg, label)
    }

    /// Create an unexpected error formatted as `[{label}] {msg}`.
    pub fn unexpected(msg: impl fmt::Display, label: &str) -> Self {
        Self::new(ErrorKind::Unexpected, msg, label)
    }

    /// Attach the provider error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a source error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the formatted message without the source chain.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Provider error code such as `NoSuchBucket`, if one was reported.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// HTTP status of the failed request, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether the service reported the addressed resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
            || matches!(self.code(), Some("NoSuchBucket" | "NoSuchKey" | "NotFound"))
    }

    /// Whether the service reported the bucket itself as missing.
    pub fn is_missing_bucket(&self) -> bool {
        match self.code() {
            Some(code) => code == "NoSuchBucket",
            None => self.status == Some(404),
        }
    }

    /// Convert an [`object_store::Error`] into a crate [`Error`].
    pub(crate) fn from_object_store(err: object_store::Error) -> Self {
        let kind = match &err {
            object_store::Error::UnknownConfigurationKey { .. }
            | object_store::Error::InvalidPath { .. } => ErrorKind::Configuration,
            object_store::Error::JoinError { .. } | object_store::Error::NotSupported { .. } => {
                ErrorKind::Unexpected
            }
            _ => ErrorKind::Service,
        };

        let status = match &err {
            object_store::Error::NotFound { .. } => Some(404),
            object_store::Error::PermissionDenied { .. } => Some(403),
            object_store::Error::Unauthenticated { .. } => Some(401),
            object_store::Error::AlreadyExists { .. } => Some(409),
            object_store::Error::Precondition { .. } => Some(412),
            object_store::Error::NotModified { .. } => Some(304),
            _ => None,
        };

        let chain = error_chain(&err);
        let status = status.or_else(|| parse_status(&chain));
        let code = parse_code(&chain);

        let mut error = Self::new(kind, &err, "object-store");
        error.status = status;
        error.code = code;
        error.with_source(err)
    }
}

/// Joins the display output of `err` and every error in its source chain.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        chain.push_str(": ");
        chain.push_str(&source.to_string());
        current = source.source();
    }
    chain
}

/// Extracts an HTTP status code from a rendered error chain.
fn parse_status(text: &str) -> Option<u16> {
    STATUS_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts the S3 `<Code>` element from a rendered error chain.
fn parse_code(text: &str) -> Option<String> {
    CODE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("code", &self.code)
            .field("status", &self.status)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_from_retry_message() {
        let text = "Error performing GET https://b.ewr1.vultrobjects.com/?list-type=2 in 12ms \
                    - Server returned non-2xx status code: 404 Not Found: <?xml version=\"1.0\"?>\
                    <Error><Code>NoSuchBucket</Code></Error>";
        assert_eq!(parse_status(text), Some(404));
        assert_eq!(parse_code(text).as_deref(), Some("NoSuchBucket"));
    }

    #[test]
    fn parses_legacy_status_wording() {
        let text = "Client error with status 403 Forbidden: <Code>AccessDenied</Code>";
        assert_eq!(parse_status(text), Some(403));
        assert_eq!(parse_code(text).as_deref(), Some("AccessDenied"));
    }

    #[test]
    fn missing_details_stay_empty() {
        assert_eq!(parse_status("connection refused"), None);
        assert_eq!(parse_code("connection refused"), None);
    }

    #[test]
    fn not_found_variant_maps_to_404() {
        let err = object_store::Error::NotFound {
            path: "missing.txt".to_string(),
            source: "gone".into(),
        };
        let err = Error::from_object_store(err);
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(err.is_missing_bucket());
    }

    #[test]
    fn generic_error_keeps_provider_code() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "Server returned non-2xx status code: 403 Forbidden: <Code>AccessDenied</Code>"
                .into(),
        };
        let err = Error::from_object_store(err);
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.code(), Some("AccessDenied"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn missing_key_is_not_a_missing_bucket() {
        let err = Error::service("no such key", "test")
            .with_status(404)
            .with_code("NoSuchKey");
        assert!(err.is_not_found());
        assert!(!err.is_missing_bucket());
    }

    #[test]
    fn constructors_prefix_label() {
        let err = Error::configuration("bad endpoint", "s3");
        assert_eq!(err.to_string(), "[s3] bad endpoint");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.code().is_none());
    }
}
