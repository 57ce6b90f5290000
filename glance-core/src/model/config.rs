//! Wrapper configuration.

/// Settings carried by an [`Observed`](super::Observed) wrapper and inherited
/// by every child wrapper built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    /// Keys containing this character are accepted as observable even when
    /// they are not declared. Used for dotted or synthetic property labels.
    pub path_separator: char,
}

impl WatchConfig {
    /// The default configuration: `.` separates path segments.
    pub const fn new() -> Self {
        Self {
            path_separator: '.',
        }
    }

    /// Use a different path separator.
    pub const fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    /// Whether `key` is a path-like key under this configuration.
    pub fn is_path(&self, key: &str) -> bool {
        key.contains(self.path_separator)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new()
    }
}
