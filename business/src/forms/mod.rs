//! Edit buffers with synchronous validation.
//!
//! A form holds raw user input and a set of touched fields. [`Form::commit`]
//! marks every field touched and yields the payload only when the buffer is
//! valid; field errors never leave the form any other way.

mod category_form;
mod cost_form;
mod login_form;
mod report_range;

pub use category_form::CategoryForm;
pub use cost_form::{CostForm, sanitize_amount};
pub use login_form::LoginForm;
pub use report_range::{DateRange, ReportRange};

use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Este campo es requerido")]
    Required,
    #[error("Máximo {0} caracteres")]
    MaxLength(usize),
    #[error("Mínimo {0} caracteres")]
    MinLength(usize),
    #[error("El valor mínimo es {0}")]
    MinValue(&'static str),
    #[error("Ingrese un número válido")]
    InvalidNumber,
    #[error("La fecha no puede ser posterior a hoy")]
    FutureDate,
    #[error("Seleccione una categoría que permita movimientos")]
    NotMovement,
    #[error("La fecha inicial no puede ser mayor que la fecha final")]
    RangeInverted,
    #[error("Una categoría no puede ser su propia categoría padre")]
    OwnParent,
}

/// Every failing field with its first error, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors {
    errors: Vec<(&'static str, FieldError)>,
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl FormErrors {
    /// Records `error` for `field` unless the field already has one.
    pub fn push(&mut self, field: &'static str, error: FieldError) {
        if self.get(field).is_none() {
            self.errors.push((field, error));
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, error)| error)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }
}

/// Fields the user has interacted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Touched(HashSet<&'static str>);

impl Touched {
    pub fn touch(&mut self, field: &'static str) {
        self.0.insert(field);
    }

    pub fn touch_all(&mut self, fields: &[&'static str]) {
        self.0.extend(fields.iter().copied());
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn reset(&mut self) {
        self.0.clear();
    }
}

pub trait Form {
    type Output;

    /// Field names in display order.
    const FIELDS: &'static [&'static str];

    /// Validates the buffer and builds the payload.
    fn check(&self) -> Result<Self::Output, FormErrors>;

    fn touched(&self) -> &Touched;

    fn touched_mut(&mut self) -> &mut Touched;

    fn validate(&self) -> FormErrors {
        self.check().err().unwrap_or_default()
    }

    fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Marks every field touched, then validates.
    fn commit(&mut self) -> Result<Self::Output, FormErrors> {
        self.touched_mut().touch_all(Self::FIELDS);
        self.check()
    }

    /// The error to display for `field`: only touched fields report errors.
    fn field_error(&self, field: &str) -> Option<FieldError> {
        if !self.touched().is_touched(field) {
            return None;
        }
        self.validate().get(field).cloned()
    }

    fn has_error(&self, field: &str) -> bool {
        self.field_error(field).is_some()
    }
}

/// Required, trimmed text of at most `max` characters.
fn required_text(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(field, FieldError::Required);
    } else {
        max_length(errors, field, value, max);
    }
}

fn max_length(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    if value.trim().chars().count() > max {
        errors.push(field, FieldError::MaxLength(max));
    }
}
