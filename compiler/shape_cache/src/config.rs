//! Registry configuration.

/// Knobs for a [`Registry`](crate::Registry).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Initial capacity of the entry table.
    pub capacity: usize,
    /// Seal the registry after a successful [`Registry::warm`](crate::Registry::warm).
    pub seal_on_warm: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: 512,
            seal_on_warm: false,
        }
    }
}

impl RegistryConfig {
    /// Configuration for a long-running service: construct everything up
    /// front, then refuse late constructions.
    pub fn service() -> Self {
        Self {
            seal_on_warm: true,
            ..Self::default()
        }
    }
}
