use std::cmp::Ordering;
use std::str::FromStr;

use super::property::Property;

/// Errors for malformed search and sort requests
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid criteria: {0} (expected location, price, status or bedrooms)")]
    InvalidCriteria(String),

    #[error("Invalid sort key: {0} (expected price or bedrooms)")]
    InvalidSortKey(String),
}

/// Field a search filters on, parsed from user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaKind {
    Location,
    Price,
    Status,
    Bedrooms,
}

impl FromStr for CriteriaKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "location" => Ok(CriteriaKind::Location),
            "price" => Ok(CriteriaKind::Price),
            "status" => Ok(CriteriaKind::Status),
            "bedrooms" => Ok(CriteriaKind::Bedrooms),
            _ => Err(QueryError::InvalidCriteria(s.trim().to_string())),
        }
    }
}

/// A complete search filter
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCriteria {
    /// Case-insensitive substring match on location
    Location(String),
    /// Inclusive price range
    Price { min: f64, max: f64 },
    /// Exact case-insensitive status match
    Status(String),
    /// Inclusive bedroom range
    Bedrooms { min: i64, max: i64 },
}

impl SearchCriteria {
    /// Location criteria with a lowercased keyword
    pub fn location(keyword: &str) -> Self {
        SearchCriteria::Location(keyword.to_lowercase())
    }

    /// Status criteria with a lowercased status
    pub fn status(status: &str) -> Self {
        SearchCriteria::Status(status.to_lowercase())
    }

    /// Check whether a property satisfies this filter
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            SearchCriteria::Location(keyword) => property
                .location
                .to_lowercase()
                .contains(&keyword.to_lowercase()),
            SearchCriteria::Status(status) => property.status.to_lowercase() == status.to_lowercase(),
            SearchCriteria::Price { min, max } => match property.price_value() {
                Some(price) => *min <= price && price <= *max,
                None => {
                    log::warn!(
                        "Skipping property {}: price {:?} is not a number",
                        property.id,
                        property.price
                    );
                    false
                }
            },
            SearchCriteria::Bedrooms { min, max } => match property.bedrooms_value() {
                Some(bedrooms) => *min <= bedrooms && bedrooms <= *max,
                None => {
                    log::warn!(
                        "Skipping property {}: bedrooms {:?} is not an integer",
                        property.id,
                        property.bedrooms
                    );
                    false
                }
            },
        }
    }
}

/// Numeric field to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Bedrooms,
}

impl SortKey {
    /// Numeric sort value of a property, `None` when the field does not parse
    pub fn value(self, property: &Property) -> Option<f64> {
        match self {
            SortKey::Price => property.price_value(),
            SortKey::Bedrooms => property.bedrooms_value().map(|b| b as f64),
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "bedrooms" => Ok(SortKey::Bedrooms),
            _ => Err(QueryError::InvalidSortKey(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }

    /// Compare two sort values. Unparseable values go last in either direction.
    pub fn compare(self, a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => match self {
                SortOrder::Ascending => a.total_cmp(&b),
                SortOrder::Descending => b.total_cmp(&a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
