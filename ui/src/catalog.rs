//! The schema catalog: every trait field a segment can be built from.

use crate::types::{SchemaOption, TraitKind};

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCatalog {
    options: Vec<SchemaOption>,
}

impl SchemaCatalog {
    /// Build a catalog from options. Later duplicates of a value are dropped.
    pub fn new(options: Vec<SchemaOption>) -> Self {
        let mut unique: Vec<SchemaOption> = Vec::with_capacity(options.len());
        for option in options {
            if unique.iter().any(|o| o.value == option.value) {
                log::warn!("Duplicate schema value '{}' ignored", option.value);
                continue;
            }
            unique.push(option);
        }
        Self { options: unique }
    }

    pub fn list(&self) -> &[SchemaOption] {
        &self.options
    }

    pub fn lookup(&self, value: &str) -> Option<&SchemaOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.lookup(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new(vec![
            SchemaOption::new("First Name", "first_name", TraitKind::User),
            SchemaOption::new("Last Name", "last_name", TraitKind::User),
            SchemaOption::new("Gender", "gender", TraitKind::User),
            SchemaOption::new("Age", "age", TraitKind::User),
            SchemaOption::new("Account Name", "account_name", TraitKind::Group),
            SchemaOption::new("City", "city", TraitKind::Group),
            SchemaOption::new("State", "state", TraitKind::Group),
        ])
    }
}
