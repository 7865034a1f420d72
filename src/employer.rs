//! Employer data model and the text-matching predicate.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Employer identifier, stable and unique within a dataset.
pub type EmployerId = i64;

/// Highest discount an employer may offer.
pub const MAX_DISCOUNT: u8 = 100;

/// An employer offering a discount.
///
/// Immutable once built by an [`EmployerSource`](crate::source::EmployerSource).
/// The serde field names follow the external API's wire shape:
///
/// ```
/// use employer_search::Employer;
///
/// let json = r#"{"EmployerID":14116,"Name":"Achmea Zeist","Place":"ZEIST","DiscountPercentage":17}"#;
/// let employer: Employer = serde_json::from_str(json).unwrap();
/// assert_eq!(employer.display_name(), "Achmea Zeist - ZEIST");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employer {
    #[serde(rename = "EmployerID")]
    pub id: EmployerId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Place")]
    pub place: String,
    #[serde(rename = "DiscountPercentage")]
    pub discount_percentage: u8,
}

impl Employer {
    pub fn new(
        id: EmployerId,
        name: impl Into<String>,
        place: impl Into<String>,
        discount_percentage: u8,
    ) -> Self {
        Employer {
            id,
            name: name.into(),
            place: place.into(),
            discount_percentage,
        }
    }

    /// Case-insensitive substring match against `name` and `place`.
    ///
    /// An empty query matches every employer. No tokenization is applied:
    /// `"den haag"` matches `"DEN HAAG"` but `"haag den"` does not.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.place.to_lowercase().contains(&query)
    }

    /// Name with location, e.g. `"TU Delft - DELFT"`.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.place)
    }

    /// Check the record against the data model invariants.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the discount exceeds 100%.
    pub fn validate(&self) -> Result<()> {
        if self.discount_percentage > MAX_DISCOUNT {
            return Err(Error::ValidationError(format!(
                "employer {} has discount {}% (max {}%)",
                self.id, self.discount_percentage, MAX_DISCOUNT
            )));
        }
        Ok(())
    }
}

/// Keep the employers matching `query`, preserving order.
pub fn filter_matching(employers: Vec<Employer>, query: &str) -> Vec<Employer> {
    if query.is_empty() {
        return employers;
    }
    employers.into_iter().filter(|e| e.matches(query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achmea() -> Employer {
        Employer::new(1, "Achmea Zeist", "ZEIST", 17)
    }

    #[test]
    fn test_matches_name_and_place_case_insensitive() {
        let employer = achmea();

        assert!(employer.matches("Achmea"));
        assert!(employer.matches("achmea"));
        assert!(employer.matches("ZEIST"));
        assert!(employer.matches("zei"));
    }

    #[test]
    fn test_matches_non_matching_query() {
        let employer = achmea();

        assert!(!employer.matches("Amsterdam"));
        assert!(!employer.matches("Rabobank"));
    }

    #[test]
    fn test_matches_empty_query() {
        assert!(achmea().matches(""));
    }

    #[test]
    fn test_matches_no_tokenization() {
        let employer = Employer::new(2, "Shell Nederland B.V.", "DEN HAAG", 7);
        assert!(employer.matches("den haag"));
        assert!(!employer.matches("haag den"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(achmea().display_name(), "Achmea Zeist - ZEIST");
    }

    #[test]
    fn test_validate() {
        assert!(achmea().validate().is_ok());
        assert!(Employer::new(3, "Full", "X", 100).validate().is_ok());

        let err = Employer::new(4, "Too Generous", "X", 101)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(achmea()).unwrap();
        assert_eq!(json["EmployerID"], 1);
        assert_eq!(json["Name"], "Achmea Zeist");
        assert_eq!(json["Place"], "ZEIST");
        assert_eq!(json["DiscountPercentage"], 17);
    }

    #[test]
    fn test_filter_matching_preserves_order() {
        let employers = vec![
            Employer::new(1, "ING Groep N.V.", "AMSTERDAM", 10),
            Employer::new(2, "TU Delft", "DELFT", 12),
            Employer::new(3, "Adyen N.V.", "AMSTERDAM", 19),
        ];

        let ids: Vec<_> = filter_matching(employers, "amsterdam")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
