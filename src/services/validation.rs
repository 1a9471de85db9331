//! Input normalization shared by the services

use crate::errors::InternalError;

/// Trim, mapping blank strings to `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed value or a `Validation` error naming the field
pub fn required_text(value: &str, field: &str) -> Result<String, InternalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InternalError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Collects the names of missing required fields so one error can list them all
#[derive(Debug, Default)]
pub struct MissingFields(Vec<&'static str>);

impl MissingFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &'static str, value: &Option<String>) {
        if value.is_none() {
            self.0.push(field);
        }
    }

    /// `Ok` when nothing was missing, otherwise one message naming every field
    pub fn into_result(self, context: &str) -> Result<(), InternalError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(InternalError::validation(format!(
                "{} requires: {}",
                context,
                self.0.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(optional_text(Some("   ".to_string())), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(" Travel ", "Name").unwrap(), "Travel");
        let err = required_text("  ", "Name").unwrap_err();
        assert!(matches!(err, InternalError::Validation(ref msg) if msg == "Name is required"));
    }

    #[test]
    fn test_missing_fields_lists_all() {
        let mut missing = MissingFields::new();
        missing.check("DirectorCode", &None);
        missing.check("ReasonCode", &Some("R1".to_string()));
        missing.check("CpcCode", &None);

        let err = missing.into_result("Expense work item").unwrap_err();
        assert!(matches!(
            err,
            InternalError::Validation(ref msg) if msg == "Expense work item requires: DirectorCode, CpcCode"
        ));
    }
}
