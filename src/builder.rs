use crate::Registry;

/// Longest accepted event name, in characters, by default.
pub const DEFAULT_MAX_NAME_LEN: usize = 260;

/// What [`Registry::create`] does when the name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameCollision {
    /// Return a new handle to the existing object. The requested reset mode
    /// and initial state are ignored.
    #[default]
    OpenExisting,
    /// Fail with [`Error::AlreadyExists`](crate::Error::AlreadyExists).
    Fail,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub name_collision: NameCollision,
    pub max_name_len: usize,
    pub capacity: usize,
}

/// Builder for [`Registry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    config: Config,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Create the builder with default config.
    pub fn new() -> Self {
        Self {
            config: Config {
                name_collision: NameCollision::default(),
                max_name_len: DEFAULT_MAX_NAME_LEN,
                capacity: 0,
            },
        }
    }

    /// Set the behavior of `create` on a live name.
    pub fn name_collision(&mut self, policy: NameCollision) -> &mut Self {
        self.config.name_collision = policy;
        self
    }

    /// Set the longest accepted name, in characters, namespace prefix
    /// included.
    pub fn max_name_len(&mut self, len: usize) -> &mut Self {
        self.config.max_name_len = len;
        self
    }

    /// Pre-size the handle table.
    pub fn capacity(&mut self, capacity: usize) -> &mut Self {
        self.config.capacity = capacity;
        self
    }

    /// Build [`Registry`].
    pub fn build(&self) -> Registry {
        Registry::with_config(self.config.clone())
    }
}
