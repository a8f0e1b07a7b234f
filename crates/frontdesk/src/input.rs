//! Validated front-desk requests.
//!
//! The registry accepts any text. Front ends build these requests first so
//! that blank names and contacts never reach it.

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::time::Clock;
use crate::visitor::{VisitorId, VisitorRecord};

/// A check-in with a non-blank name and contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    name: String,
    contact: String,
}

impl CheckIn {
    /// Validate a check-in. Text is kept exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] naming the first blank field.
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Result<Self> {
        let name = required("name", name.into())?;
        let contact = required("contact", contact.into())?;
        Ok(Self { name, contact })
    }

    /// Apply to a registry.
    pub fn apply<C: Clock>(&self, registry: &mut Registry<C>) -> VisitorId {
        registry.check_in(&self.name, &self.contact)
    }
}

/// A check-out with a non-blank name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOut {
    name: String,
}

impl CheckOut {
    /// Validate a check-out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = required("name", name.into())?;
        Ok(Self { name })
    }

    /// Apply to a registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VisitorNotFound`] if nobody by that name is inside.
    pub fn apply<'r, C: Clock>(
        &self,
        registry: &'r mut Registry<C>,
    ) -> Result<&'r VisitorRecord> {
        registry.check_out(&self.name)
    }
}

fn required(field: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(Error::empty_field(field))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_accepts_text() {
        let request = CheckIn::new("Alice", "a@x.com").unwrap();
        let mut registry = Registry::new();
        let id = request.apply(&mut registry);
        assert_eq!(registry.get(id).unwrap().name(), "Alice");
    }

    #[test]
    fn test_check_in_rejects_blank_name() {
        let err = CheckIn::new("", "a@x.com").unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "name" }));

        let err = CheckIn::new("   ", "a@x.com").unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "name" }));
    }

    #[test]
    fn test_check_in_rejects_blank_contact() {
        let err = CheckIn::new("Alice", "\t").unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "contact" }));
    }

    #[test]
    fn test_check_in_keeps_surrounding_whitespace() {
        let request = CheckIn::new(" Alice ", "a@x.com").unwrap();
        let mut registry = Registry::new();
        request.apply(&mut registry);
        assert_eq!(registry.records()[0].name(), " Alice ");
    }

    #[test]
    fn test_check_out_rejects_blank_name() {
        let err = CheckOut::new("").unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "name" }));
    }

    #[test]
    fn test_rejected_requests_never_touch_registry() {
        let registry = Registry::new();
        assert!(CheckIn::new("", "").is_err());
        assert!(CheckOut::new(" ").is_err());
        assert!(registry.is_empty());
        assert!(registry.log().is_empty());
    }

    #[test]
    fn test_check_out_apply() {
        let mut registry = Registry::new();
        CheckIn::new("Alice", "a@x.com").unwrap().apply(&mut registry);

        let record = CheckOut::new("Alice").unwrap().apply(&mut registry).unwrap();
        assert!(!record.is_inside());

        let err = CheckOut::new("Alice").unwrap().apply(&mut registry).unwrap_err();
        assert!(err.is_not_found());
    }
}
