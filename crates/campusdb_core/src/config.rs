//! Registry configuration.

/// Configuration for constructing a [`crate::University`].
#[derive(Debug, Clone)]
pub struct Config {
    /// How many emitted events the feed retains for polling.
    pub event_history: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_history: 10_000,
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event history bound.
    #[must_use]
    pub const fn event_history(mut self, size: usize) -> Self {
        self.event_history = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.event_history, 10_000);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().event_history(64);
        assert_eq!(config.event_history, 64);
    }
}
