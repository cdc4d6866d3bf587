use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    Rejected,
    SessionExpired,
    NotAuthenticated,
    NetworkError,
    UnknownError,
    NotFound,
    NoActiveProject,
    CycleDetected,
    Cancelled,
    ConfigError,
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Rejected => "REJECTED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::NetworkError => "NETWORK_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::NoActiveProject => "NO_ACTIVE_PROJECT",
            Self::CycleDetected => "CYCLE_DETECTED",
            Self::Cancelled => "CANCELLED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    /// Process exit code for a command that failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SessionExpired | Self::NotAuthenticated => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ObraError {
    pub code: ErrorCode,
    pub message: String,
    /// HTTP status of the response that produced the error, when there was one.
    pub status: Option<u16>,
}

impl ObraError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// A 4xx/5xx answer carrying a `detail` message, kept verbatim.
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Rejected, detail).with_status(status)
    }

    pub fn session_expired() -> Self {
        Self::new(
            ErrorCode::SessionExpired,
            "Session expired. Run `obra login <email>` again.",
        )
        .with_status(401)
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            ErrorCode::NotAuthenticated,
            "Not logged in. Run `obra login <email>` first.",
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn unknown(status: u16) -> Self {
        Self::new(
            ErrorCode::UnknownError,
            format!("Request failed with status code {status}"),
        )
        .with_status(status)
    }

    pub fn not_found(kind: &str, id: i64) -> Self {
        Self::new(ErrorCode::NotFound, format!("{kind} not found: {id}"))
    }

    pub fn no_active_project() -> Self {
        Self::new(
            ErrorCode::NoActiveProject,
            "No active project. Use `obra project use <id>` or `--project <id>`.",
        )
    }

    pub fn cycle_detected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CycleDetected, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "Cancelled.")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl From<reqwest::Error> for ObraError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::unknown(status.as_u16()),
            None => Self::network(e.to_string()),
        }
    }
}

impl From<std::io::Error> for ObraError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<serde_json::Error> for ObraError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorCode::UnknownError, format!("Malformed response: {e}"))
    }
}
