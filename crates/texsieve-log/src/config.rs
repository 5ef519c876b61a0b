use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column at which TeX engines break their terminal and log output.
pub const DEFAULT_WRAP_WIDTH: usize = 79;

/// `file:line: message`, as printed with `-file-line-error`.
pub const DEFAULT_ERROR_PATTERN: &str = r"^(?:(?P<file>.+?))?:(?P<line>\d+): (?P<message>.+)$";

/// Line starts that identify a warning, checked in order.
pub const DEFAULT_WARNING_PREFIXES: &[&str] = &[
    "LaTeX Warning: ",
    "LaTeX Font Warning: ",
    "AVAIL list clobbered at",
    "Double-AVAIL list clobbered at",
    "Doubly free location at",
    "Bad flag at",
    "Runaway definition",
    "Runaway argument",
    "Runaway text",
    "Missing character: There is no",
    "No pages of output.",
    "Underfull \\hbox",
    "Overfull \\hbox",
    "Loose \\hbox",
    "Tight \\hbox",
    "Underfull \\vbox",
    "Overfull \\vbox",
    "Loose \\vbox",
    "Tight \\vbox",
];

static DEFAULT_ERROR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_ERROR_PATTERN).expect("default error pattern is valid"));

/// Errors raised while building a [`ParserConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("wrap width must be greater than zero")]
    ZeroWrapWidth,
    #[error("warning prefixes must not be empty strings")]
    EmptyPrefix,
    #[error("invalid error pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("error pattern has no `message` capture group")]
    MissingMessageGroup,
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable settings shared by every parser of a compilation run.
///
/// Construct once, wrap in an `Arc`, and hand it to as many
/// [`LogParser`](crate::LogParser)s as needed.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    wrap_width: usize,
    warning_prefixes: Vec<String>,
    error_pattern: Regex,
    flush_on_end: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            warning_prefixes: DEFAULT_WARNING_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            error_pattern: DEFAULT_ERROR_REGEX.clone(),
            flush_on_end: false,
        }
    }
}

/// On-disk shape of the configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    wrap_width: Option<usize>,
    warning_prefixes: Option<Vec<String>>,
    extra_warning_prefixes: Vec<String>,
    error_pattern: Option<String>,
    flush_on_end: Option<bool>,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    pub fn warning_prefixes(&self) -> &[String] {
        &self.warning_prefixes
    }

    pub fn error_pattern(&self) -> &Regex {
        &self.error_pattern
    }

    /// Whether a listener flushes an unfinished diagnostic when the process ends.
    pub fn flush_on_end(&self) -> bool {
        self.flush_on_end
    }

    pub fn with_wrap_width(mut self, width: usize) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWrapWidth);
        }
        self.wrap_width = width;
        Ok(self)
    }

    /// Replaces the prefix table. Duplicates are dropped, first occurrence wins.
    pub fn with_warning_prefixes<I, P>(mut self, prefixes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.warning_prefixes.clear();
        self.with_extra_warning_prefixes(prefixes)
    }

    /// Appends to the prefix table.
    pub fn with_extra_warning_prefixes<I, P>(mut self, prefixes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        for prefix in prefixes {
            let prefix = prefix.into();
            if prefix.is_empty() {
                return Err(ConfigError::EmptyPrefix);
            }
            if !self.warning_prefixes.contains(&prefix) {
                self.warning_prefixes.push(prefix);
            }
        }
        Ok(self)
    }

    pub fn with_error_pattern(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern)?;
        if !regex.capture_names().flatten().any(|name| name == "message") {
            return Err(ConfigError::MissingMessageGroup);
        }
        self.error_pattern = regex;
        Ok(self)
    }

    pub fn with_flush_on_end(mut self, flush: bool) -> Self {
        self.flush_on_end = flush;
        self
    }

    /// Builds a configuration from JSON, starting from the defaults.
    ///
    /// ```
    /// use texsieve_log::ParserConfig;
    ///
    /// let config = ParserConfig::from_json_str(r#"{ "wrap_width": 100 }"#)?;
    /// assert_eq!(config.wrap_width(), 100);
    /// # Ok::<(), texsieve_log::ConfigError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let mut config = Self::default();
        if let Some(width) = file.wrap_width {
            config = config.with_wrap_width(width)?;
        }
        if let Some(prefixes) = file.warning_prefixes {
            config = config.with_warning_prefixes(prefixes)?;
        }
        config = config.with_extra_warning_prefixes(file.extra_warning_prefixes)?;
        if let Some(pattern) = file.error_pattern {
            config = config.with_error_pattern(&pattern)?;
        }
        if let Some(flush) = file.flush_on_end {
            config = config.with_flush_on_end(flush);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded parser configuration from {:?}", path);
        Ok(config)
    }
}
