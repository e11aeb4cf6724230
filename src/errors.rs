// Error types for the fallible edges: configuration files, URL launching and
// link arguments. Link registration and hit testing never fail.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("toml serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("refusing to open URL with scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("failed to open {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// A `TEXT=URL` link argument that could not be understood.
#[derive(Debug, thiserror::Error)]
pub enum ParseLinkError {
    #[error("expected TEXT=URL, got '{0}'")]
    MissingSeparator(String),

    #[error("link text must not be empty")]
    EmptyText,

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OpenError::UnsupportedScheme("javascript".to_string());
        assert_eq!(
            err.to_string(),
            "refusing to open URL with scheme 'javascript'"
        );

        let err = ConfigError::Io {
            path: PathBuf::from("/tmp/linked_label.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.to_string(),
            "failed to access config file /tmp/linked_label.toml: gone"
        );
    }
}
