//! Codec configuration.
//!
//! The wire format itself is fixed; these knobs only bound how much work a
//! single parse may do and how strict semantic validation is.


/// Default maximum depth of nested diagnostic contexts
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Default maximum number of elements in one terminated or counted array
pub const DEFAULT_MAX_ARRAY_ELEMENTS: usize = 4096;

/// Limits and validation switches threaded through a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Maximum depth of nested contexts (each constructed value opens one)
    pub max_nesting_depth: usize,
    /// Maximum number of elements read into a single array field
    pub max_array_elements: usize,
    /// Enforce fixed array cardinalities (for example exactly 16 priorities)
    pub validate_cardinality: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_array_elements: DEFAULT_MAX_ARRAY_ELEMENTS,
            validate_cardinality: true,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_max_array_elements(mut self, elements: usize) -> Self {
        self.max_array_elements = elements;
        self
    }

    /// Lenient mode for captured traffic from devices that pad or truncate arrays
    pub fn with_cardinality_validation(mut self, enabled: bool) -> Self {
        self.validate_cardinality = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_nesting_depth, 32);
        assert_eq!(config.max_array_elements, 4096);
        assert!(config.validate_cardinality);
    }

    #[test]
    fn test_with_methods() {
        let config = CodecConfig::new()
            .with_max_nesting_depth(4)
            .with_max_array_elements(10)
            .with_cardinality_validation(false);
        assert_eq!(config.max_nesting_depth, 4);
        assert_eq!(config.max_array_elements, 10);
        assert!(!config.validate_cardinality);
    }
}
