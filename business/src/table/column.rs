use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ustr::Ustr;

use super::CellValue;

/// How a column's values are rendered when no explicit formatter is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Currency,
    Badge,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    #[default]
    Default,
}

impl BadgeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Default => "default",
        }
    }
}

pub type Formatter = Arc<dyn Fn(&CellValue) -> String + Send + Sync>;
pub type BadgeMapper = Arc<dyn Fn(&CellValue) -> BadgeColor + Send + Sync>;

/// Describes how one field is read, rendered and sorted.
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub key: Ustr,
    pub label: String,
    pub sortable: bool,
    pub kind: ColumnType,
    /// Display width hint in characters.
    pub width: Option<u16>,
    pub align: Align,
    formatter: Option<Formatter>,
    badge_color: Option<BadgeMapper>,
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("formatter", &self.formatter.is_some())
            .field("badge_color", &self.badge_color.is_some())
            .finish()
    }
}

impl ColumnDescriptor {
    pub fn new(key: &str, label: impl Into<String>) -> Self {
        Self {
            key: Ustr::from(key),
            label: label.into(),
            sortable: false,
            kind: ColumnType::Text,
            width: None,
            align: Align::Left,
            formatter: None,
            badge_color: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Overrides type-based rendering for this column.
    pub fn formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    pub fn badge_color<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValue) -> BadgeColor + Send + Sync + 'static,
    {
        self.badge_color = Some(Arc::new(f));
        self
    }

    pub fn custom_formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    pub fn badge_mapper(&self) -> Option<&BadgeMapper> {
        self.badge_color.as_ref()
    }
}
