// Opening tapped URLs with the platform's default handler

use crate::errors::OpenError;
use url::Url;

/// Something that can hand a URL to the outside world.
pub trait UrlOpener {
    fn can_open(&self, url: &Url) -> bool;
    fn open(&self, url: &Url) -> Result<(), OpenError>;
}

pub const DEFAULT_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Opens URLs via the desktop's default browser or mail client, restricted to
/// an allowlist of schemes.
#[derive(Debug, Clone)]
pub struct SystemOpener {
    schemes: Vec<String>,
}

impl SystemOpener {
    pub fn new() -> Self {
        Self::with_schemes(DEFAULT_SCHEMES)
    }

    pub fn with_schemes<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SystemOpener {
            schemes: schemes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlOpener for SystemOpener {
    fn can_open(&self, url: &Url) -> bool {
        // Url::scheme() is always lowercase.
        self.schemes.iter().any(|s| s == url.scheme())
    }

    fn open(&self, url: &Url) -> Result<(), OpenError> {
        if !self.can_open(url) {
            return Err(OpenError::UnsupportedScheme(url.scheme().to_string()));
        }
        tracing::info!(url = %url, "opening link");
        open::that(url.as_str()).map_err(|source| OpenError::Launch {
            url: url.to_string(),
            source,
        })
    }
}
