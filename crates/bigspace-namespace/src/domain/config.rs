//! Namespace configuration and validation
//!
//! # Example
//!
//! ```
//! use bigspace_namespace::domain::{NamespaceConfigBuilder, WritePolicy};
//!
//! let config = NamespaceConfigBuilder::new()
//!     .item_count(3)
//!     .write_policy(WritePolicy::Delegate)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.item_name(2), "DataItem_0002");
//! ```

use serde::{Deserialize, Serialize};

use super::node_id::STANDARD_NAMESPACE;
use crate::error::NamespaceError;

/// Largest namespace this crate will build.
pub const MAX_ITEMS: usize = 1_000_000;

/// Widest zero padding accepted for item names.
pub const MAX_NAME_WIDTH: usize = 12;

/// Whether writes through the attribute path reach the item store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WritePolicy {
    /// Every write through the attribute path is refused.
    #[default]
    ReadOnly,
    /// Writes to items are applied like any producer update.
    Delegate,
}

impl WritePolicy {
    pub fn is_writable(&self) -> bool {
        matches!(self, WritePolicy::Delegate)
    }
}

/// Namespace configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// URI identifying this namespace
    pub namespace_uri: String,
    /// Index of this namespace in the server's namespace table
    pub namespace_index: u16,
    /// Number of items created at construction
    pub item_count: usize,
    /// Prefix of every item name
    pub item_prefix: String,
    /// Zero padding of the item sequence number
    pub name_width: usize,
    /// Write policy of the attribute path
    pub write_policy: WritePolicy,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            namespace_uri: "urn:bigspace:SampleBigAddressSpace".to_string(),
            namespace_index: 2,
            item_count: 1000,
            item_prefix: "DataItem_".to_string(),
            name_width: 4,
            write_policy: WritePolicy::ReadOnly,
        }
    }
}

impl NamespaceConfig {
    pub fn validate(&self) -> Result<(), NamespaceError> {
        if self.namespace_index == STANDARD_NAMESPACE {
            return Err(NamespaceError::InvalidConfig(
                "namespace_index 0 is reserved for standard nodes".to_string(),
            ));
        }

        if self.item_count > MAX_ITEMS {
            return Err(NamespaceError::InvalidConfig(format!(
                "item_count {} exceeds maximum {}",
                self.item_count, MAX_ITEMS
            )));
        }

        if self.item_prefix.is_empty() {
            return Err(NamespaceError::InvalidConfig(
                "item_prefix cannot be empty".to_string(),
            ));
        }

        if self.name_width == 0 || self.name_width > MAX_NAME_WIDTH {
            return Err(NamespaceError::InvalidConfig(format!(
                "name_width must be between 1 and {}",
                MAX_NAME_WIDTH
            )));
        }

        Ok(())
    }

    /// Name of the item with sequence number `index`.
    pub fn item_name(&self, index: usize) -> String {
        format!(
            "{}{:0width$}",
            self.item_prefix,
            index,
            width = self.name_width
        )
    }
}

/// Builder for NamespaceConfig with validation
#[derive(Default)]
pub struct NamespaceConfigBuilder {
    namespace_uri: Option<String>,
    namespace_index: Option<u16>,
    item_count: Option<usize>,
    item_prefix: Option<String>,
    name_width: Option<usize>,
    write_policy: Option<WritePolicy>,
}

impl NamespaceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(uri.into());
        self
    }

    pub fn namespace_index(mut self, index: u16) -> Self {
        self.namespace_index = Some(index);
        self
    }

    pub fn item_count(mut self, count: usize) -> Self {
        self.item_count = Some(count);
        self
    }

    pub fn item_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.item_prefix = Some(prefix.into());
        self
    }

    pub fn name_width(mut self, width: usize) -> Self {
        self.name_width = Some(width);
        self
    }

    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = Some(policy);
        self
    }

    /// Build the NamespaceConfig, validating all parameters
    pub fn build(self) -> Result<NamespaceConfig, NamespaceError> {
        let defaults = NamespaceConfig::default();

        let config = NamespaceConfig {
            namespace_uri: self.namespace_uri.unwrap_or(defaults.namespace_uri),
            namespace_index: self.namespace_index.unwrap_or(defaults.namespace_index),
            item_count: self.item_count.unwrap_or(defaults.item_count),
            item_prefix: self.item_prefix.unwrap_or(defaults.item_prefix),
            name_width: self.name_width.unwrap_or(defaults.name_width),
            write_policy: self.write_policy.unwrap_or(defaults.write_policy),
        };

        config.validate()?;
        Ok(config)
    }
}
