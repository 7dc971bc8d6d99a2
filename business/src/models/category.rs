use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::table::{CellValue, TableRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<u64>,
    pub level: u32,
    /// Only movement categories can have costs booked against them.
    pub is_movement: bool,
}

impl TableRow for Category {
    fn row_id(&self) -> Ustr {
        Ustr::from(self.id.to_string().as_str())
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "code" => self.code.as_str().into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.clone().into(),
            "parent" => self.parent.into(),
            "level" => self.level.into(),
            "is_movement" => self.is_movement.into(),
            _ => CellValue::Null,
        }
    }
}

/// A category with its children, as returned by `/costs/categories/tree/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub subcategories: Vec<CategoryTree>,
}

impl CategoryTree {
    /// Depth-first walk yielding `(depth, category)`, roots at depth 0.
    pub fn walk(&self) -> Vec<(usize, &Category)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Category)>) {
        out.push((depth, &self.category));
        for child in &self.subcategories {
            child.walk_into(depth + 1, out);
        }
    }
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPayload {
    pub code: String,
    pub name: String,
    pub description: String,
    pub parent: Option<u64>,
    pub level: u32,
    pub is_movement: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_walk_is_depth_first() {
        let tree: CategoryTree = serde_json::from_str(
            r#"{
                "id": 1, "code": "1", "name": "Alimentación", "description": "",
                "parent": null, "level": 1, "is_movement": false,
                "subcategories": [
                    {"id": 2, "code": "1.1", "name": "Concentrado", "parent": 1, "level": 2,
                     "is_movement": true, "subcategories": []},
                    {"id": 3, "code": "1.2", "name": "Sal", "parent": 1, "level": 2,
                     "is_movement": true}
                ]
            }"#,
        )
        .unwrap();

        let walked: Vec<(usize, &str)> = tree
            .walk()
            .into_iter()
            .map(|(depth, c)| (depth, c.code.as_str()))
            .collect();
        assert_eq!(walked, vec![(0, "1"), (1, "1.1"), (1, "1.2")]);
    }

    #[test]
    fn test_category_fields() {
        let category = Category {
            id: 9,
            code: "2.1".to_owned(),
            name: "Vacunas".to_owned(),
            description: None,
            parent: Some(2),
            level: 2,
            is_movement: true,
        };
        assert_eq!(category.row_id(), Ustr::from("9"));
        assert_eq!(category.field("level"), CellValue::from(2_u32));
        assert_eq!(category.field("is_movement"), CellValue::Bool(true));
        assert!(category.field("description").is_null());
    }
}
