use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum Error {
    /// Protected path requested with no resident credential; refresh was not attempted.
    NoCredential(String),
    /// Every configured refresh endpoint candidate failed.
    RefreshExchange(String),
    /// Terminal state after a failed refresh; surfaced to the user at most once.
    SessionExpired,
    /// Authorization succeeded but the action is disallowed; never refreshed.
    Forbidden(String),
    /// Business-level 422 with per-field detail preserved for the caller to render.
    Validation(serde_json::Value),
    NotFound(String),
    Server(StatusCode, String),
    UnexpectedStatus(StatusCode, String),
    Http(reqwest::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoCredential(path) => {
                write!(f, "no credential resident for protected path '{}'", path)
            }
            Error::RefreshExchange(reason) => {
                write!(f, "credential refresh exchange failed: {}", reason)
            }
            Error::SessionExpired => write!(f, "session expired"),
            Error::Forbidden(body) => write!(f, "forbidden: {}", body),
            Error::Validation(detail) => write!(f, "validation failed: {}", detail),
            Error::NotFound(path) => write!(f, "not found: {}", path),
            Error::Server(status, body) => {
                write!(f, "server error: status={} body='{}'", status, body)
            }
            Error::UnexpectedStatus(status, body) => {
                write!(f, "unexpected status: status={} body='{}'", status, body)
            }
            Error::Http(err) => write!(f, "http error: {}", err),
            Error::Json(err) => write!(f, "json error: {}", err),
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
