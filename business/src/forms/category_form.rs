use super::{FieldError, Form, FormErrors, Touched, max_length, required_text};
use crate::models::{Category, CategoryPayload};

pub const CODE_MAX: usize = 20;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 255;

/// Create/edit buffer for a category. The level follows the chosen parent.
#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub is_movement: bool,
    parent: Option<u64>,
    level: u32,
    editing: Option<u64>,
    categories: Vec<Category>,
    touched: Touched,
}

impl CategoryForm {
    /// Empty buffer for a new category. `categories` are the candidate parents.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            description: String::new(),
            is_movement: false,
            parent: None,
            level: 1,
            editing: None,
            categories,
            touched: Touched::default(),
        }
    }

    /// Buffer preloaded with `category`, which is excluded from the parent choices.
    pub fn edit(category: &Category, categories: Vec<Category>) -> Self {
        Self {
            code: category.code.clone(),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            is_movement: category.is_movement,
            parent: category.parent,
            level: category.level,
            editing: Some(category.id),
            categories,
            touched: Touched::default(),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<u64> {
        self.editing
    }

    pub fn parent(&self) -> Option<u64> {
        self.parent
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Changes the parent and recomputes the level: one below the parent, or 1 at the root.
    ///
    /// An unknown parent id, or the category being edited, leaves the level untouched.
    pub fn set_parent(&mut self, parent: Option<u64>) {
        self.parent = parent;
        self.touched.touch("parent");
        match parent {
            None => self.level = 1,
            Some(id) => {
                if let Some(found) = self.available_parents().into_iter().find(|c| c.id == id) {
                    self.level = found.level + 1;
                }
            }
        }
    }

    pub fn available_parents(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| Some(c.id) != self.editing)
            .collect()
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.touch(field);
    }
}

impl Form for CategoryForm {
    type Output = CategoryPayload;

    const FIELDS: &'static [&'static str] =
        &["code", "name", "description", "parent", "level", "is_movement"];

    fn check(&self) -> Result<CategoryPayload, FormErrors> {
        let mut errors = FormErrors::default();
        required_text(&mut errors, "code", &self.code, CODE_MAX);
        required_text(&mut errors, "name", &self.name, NAME_MAX);
        max_length(&mut errors, "description", &self.description, DESCRIPTION_MAX);
        if self.parent.is_some() && self.parent == self.editing {
            errors.push("parent", FieldError::OwnParent);
        }
        if self.level < 1 {
            errors.push("level", FieldError::MinValue("1"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CategoryPayload {
            code: self.code.trim().to_owned(),
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            parent: self.parent,
            level: self.level,
            is_movement: self.is_movement,
        })
    }

    fn touched(&self) -> &Touched {
        &self.touched
    }

    fn touched_mut(&mut self) -> &mut Touched {
        &mut self.touched
    }
}
