use crate::errors::{ScanError, ScanResult};

/// What a record must contain to count as a match.
///
/// Both checks are case-sensitive substring tests; an empty date matches any
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    email: String,
    date: String,
}

impl SearchCriteria {
    /// Creates criteria for `email`, optionally narrowed by `date`
    pub fn new(email: impl Into<String>, date: Option<&str>) -> ScanResult<Self> {
        let email = email.into();
        if email.is_empty() {
            return Err(ScanError::invalid_criteria("email must not be empty"));
        }
        Ok(Self {
            email,
            date: date.unwrap_or_default().to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The date filter, or `None` when any date matches
    pub fn date(&self) -> Option<&str> {
        (!self.date.is_empty()).then_some(self.date.as_str())
    }

    /// Checks a record's raw text against the criteria
    pub fn matches(&self, record: &str) -> bool {
        record.contains(&self.email) && (self.date.is_empty() || record.contains(&self.date))
    }
}
