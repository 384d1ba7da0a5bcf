#[derive(Debug)]
pub enum LightDuelError {
    /// Startup misconfiguration (missing or inconsistent required values).
    Config(String),
    /// The persisted lives store could not be read or written.
    Store(String),
    /// A snapshot or persisted document could not be encoded or decoded.
    Serialization(String),
}

impl std::fmt::Display for LightDuelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(m) => write!(f, "invalid configuration: {m}"),
            Self::Store(m) => write!(f, "lives store error: {m}"),
            Self::Serialization(m) => write!(f, "serialization error: {m}"),
        }
    }
}

impl std::error::Error for LightDuelError {}

impl From<std::io::Error> for LightDuelError {
    fn from(e: std::io::Error) -> Self {
        Self::Store(e.to_string())
    }
}

impl From<serde_json::Error> for LightDuelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for LightDuelError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
