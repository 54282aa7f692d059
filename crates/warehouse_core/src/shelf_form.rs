use shared::domain::{Coord, ShelfAttributes};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Add,
    Modify,
}

/// Raw text of the three shelf form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelfFields {
    pub flower: String,
    pub color: String,
    pub quantity: String,
}

impl ShelfFields {
    pub fn new(
        flower: impl Into<String>,
        color: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            flower: flower.into(),
            color: color.into(),
            quantity: quantity.into(),
        }
    }

    pub fn from_attributes(attributes: &ShelfAttributes) -> Self {
        Self {
            flower: attributes.flower.clone(),
            color: attributes.color.clone(),
            quantity: attributes.quantity.to_string(),
        }
    }

    /// Blank fields take the value staged in `staged`.
    pub fn filled_from(&self, staged: &ShelfFields) -> ShelfFields {
        let pick = |typed: &str, staged: &str| {
            if typed.trim().is_empty() {
                staged.to_string()
            } else {
                typed.to_string()
            }
        };
        ShelfFields {
            flower: pick(&self.flower, &staged.flower),
            color: pick(&self.color, &staged.color),
            quantity: pick(&self.quantity, &staged.quantity),
        }
    }

    /// All three fields are required. Values are passed on as typed.
    pub fn to_attributes(&self) -> Result<ShelfAttributes, ValidationError> {
        let flower = required("flower", &self.flower)?;
        let color = required("color", &self.color)?;
        let quantity = required("quantity", &self.quantity)?;
        Ok(ShelfAttributes {
            flower: flower.to_string(),
            color: color.to_string(),
            quantity: quantity.into(),
        })
    }
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(name))
    } else {
        Ok(value)
    }
}

/// Shelf detail form staged for the user: the cells that will become shelves
/// and the attribute inputs, pre-filled when modifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfForm {
    purpose: FormPurpose,
    targets: Vec<Coord>,
    fields: ShelfFields,
}

impl ShelfForm {
    pub(crate) fn new(purpose: FormPurpose, targets: Vec<Coord>, fields: ShelfFields) -> Self {
        Self {
            purpose,
            targets,
            fields,
        }
    }

    pub fn purpose(&self) -> FormPurpose {
        self.purpose
    }

    pub fn targets(&self) -> &[Coord] {
        &self.targets
    }

    pub fn fields(&self) -> &ShelfFields {
        &self.fields
    }
}

#[cfg(test)]
#[path = "tests/shelf_form_tests.rs"]
mod tests;
