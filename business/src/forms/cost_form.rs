use std::str::FromStr as _;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{FieldError, Form, FormErrors, Touched, max_length, required_text};
use crate::models::{Category, Cost, CostPayload};

pub const DESCRIPTION_MAX: usize = 500;
pub const NOTES_MAX: usize = 1000;

/// Keeps digits and the first `.`; later dots are dropped, digits after them kept.
///
/// `"$1.234.5"` becomes `"1.2345"`.
pub fn sanitize_amount(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut seen_dot = false;
    for ch in input.chars() {
        match ch {
            '0'..='9' => out.push(ch),
            '.' if !seen_dot => {
                seen_dot = true;
                out.push('.');
            }
            _ => {}
        }
    }
    out
}

/// Create/edit buffer for a cost.
#[derive(Debug, Clone)]
pub struct CostForm {
    pub category: Option<u64>,
    pub date_incurred: Option<NaiveDate>,
    pub description: String,
    pub notes: String,
    amount: String,
    today: NaiveDate,
    editing: Option<u64>,
    categories: Vec<Category>,
    touched: Touched,
}

impl CostForm {
    /// New cost dated `today`, which is also the latest accepted date.
    pub fn new(categories: Vec<Category>, today: NaiveDate) -> Self {
        Self {
            category: None,
            date_incurred: Some(today),
            description: String::new(),
            notes: String::new(),
            amount: String::new(),
            today,
            editing: None,
            categories,
            touched: Touched::default(),
        }
    }

    pub fn edit(cost: &Cost, categories: Vec<Category>, today: NaiveDate) -> Self {
        Self {
            category: Some(cost.category),
            date_incurred: Some(cost.date_incurred),
            description: cost.description.clone(),
            notes: cost.notes.clone().unwrap_or_default(),
            amount: cost.amount.normalize().to_string(),
            today,
            editing: Some(cost.id),
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

    pub fn max_date(&self) -> NaiveDate {
        self.today
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Stores the sanitized form of `input`.
    pub fn set_amount(&mut self, input: &str) {
        self.amount = sanitize_amount(input);
        self.touched.touch("amount");
    }

    /// Categories costs can be booked against.
    pub fn movement_categories(&self) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.is_movement).collect()
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.touch(field);
    }
}

impl Form for CostForm {
    type Output = CostPayload;

    const FIELDS: &'static [&'static str] =
        &["category", "date_incurred", "amount", "description", "notes"];

    fn check(&self) -> Result<CostPayload, FormErrors> {
        let mut errors = FormErrors::default();

        match self.category {
            None => errors.push("category", FieldError::Required),
            Some(id) => {
                let movement = self.categories.iter().any(|c| c.id == id && c.is_movement);
                if !movement {
                    errors.push("category", FieldError::NotMovement);
                }
            }
        }

        match self.date_incurred {
            None => errors.push("date_incurred", FieldError::Required),
            Some(date) if date > self.today => errors.push("date_incurred", FieldError::FutureDate),
            Some(_) => {}
        }

        let amount = if self.amount.trim().is_empty() {
            errors.push("amount", FieldError::Required);
            None
        } else {
            match Decimal::from_str(self.amount.trim()) {
                Ok(value) if value < Decimal::new(1, 2) => {
                    errors.push("amount", FieldError::MinValue("0.01"));
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push("amount", FieldError::InvalidNumber);
                    None
                }
            }
        };

        required_text(&mut errors, "description", &self.description, DESCRIPTION_MAX);
        max_length(&mut errors, "notes", &self.notes, NOTES_MAX);

        match (self.category, self.date_incurred, amount) {
            (Some(category), Some(date_incurred), Some(amount)) if errors.is_empty() => {
                Ok(CostPayload {
                    category,
                    date_incurred,
                    amount,
                    description: self.description.trim().to_owned(),
                    notes: self.notes.trim().to_owned(),
                })
            }
            _ => Err(errors),
        }
    }

    fn touched(&self) -> &Touched {
        &self.touched
    }

    fn touched_mut(&mut self) -> &mut Touched {
        &mut self.touched
    }
}
