use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Table behaviour switches. Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub selectable: bool,
    pub searchable: bool,
    pub paginated: bool,
    #[serde(alias = "pageSize")]
    pub page_size: usize,
    pub striped: bool,
    pub hover: bool,
    pub bordered: bool,
    pub compact: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            selectable: false,
            searchable: true,
            paginated: true,
            page_size: DEFAULT_PAGE_SIZE,
            striped: true,
            hover: true,
            bordered: false,
            compact: false,
        }
    }
}

impl TableConfig {
    /// Page size used for slicing; never zero.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{"pageSize": 25}"#).unwrap();
        assert_eq!(config.page_size, 25);
        assert!(config.searchable);
        assert!(config.paginated);
        assert!(!config.selectable);

        let config: TableConfig = serde_json::from_str(r#"{"selectable": true}"#).unwrap();
        assert!(config.selectable);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let config = TableConfig {
            page_size: 0,
            ..TableConfig::default()
        };
        assert_eq!(config.effective_page_size(), 1);
    }
}
