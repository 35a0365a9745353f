use serde::{Deserialize, Serialize};

/// Column names of the on-disk format, in file order
pub const HEADER: [&str; 5] = ["ID", "Location", "Price", "Bedrooms", "Status"];

/// A single property listing
///
/// Every field is kept as the exact text read from disk so a load/save cycle
/// reproduces the file. Use the `*_value` accessors for numeric comparisons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    /// Unique identifier (string of digits)
    #[serde(rename = "ID")]
    pub id: String,
    /// Free-text location
    #[serde(rename = "Location")]
    pub location: String,
    /// Asking price
    #[serde(rename = "Price")]
    pub price: String,
    /// Number of bedrooms
    #[serde(rename = "Bedrooms")]
    pub bedrooms: String,
    /// Conventionally Available, Sold or Rented (not enforced)
    #[serde(rename = "Status")]
    pub status: String,
}

/// Editable fields of a property, typed at the API boundary
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetails {
    pub location: String,
    pub price: f64,
    pub bedrooms: u32,
    pub status: String,
}

impl PropertyDetails {
    pub fn new(
        location: impl Into<String>,
        price: f64,
        bedrooms: u32,
        status: impl Into<String>,
    ) -> Self {
        PropertyDetails {
            location: location.into(),
            price,
            bedrooms,
            status: status.into(),
        }
    }
}

impl Property {
    /// Create a new property with the given numeric ID
    pub fn new(id: u64, details: PropertyDetails) -> Self {
        let mut property = Property {
            id: id.to_string(),
            location: String::new(),
            price: String::new(),
            bedrooms: String::new(),
            status: String::new(),
        };
        property.apply(details);
        property
    }

    /// Replace every field except the ID
    pub fn apply(&mut self, details: PropertyDetails) {
        self.location = details.location;
        self.price = format_price(details.price);
        self.bedrooms = details.bedrooms.to_string();
        self.status = details.status;
    }

    /// Parse the ID as a number, if it is one
    pub fn id_value(&self) -> Option<u64> {
        self.id.trim().parse().ok()
    }

    /// Whether the ID is a plain digit string, even one too large for `u64`
    pub fn is_numeric_id(&self) -> bool {
        let id = self.id.trim();
        !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
    }

    /// Parse the price as a floating point number
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse().ok()
    }

    /// Parse the bedroom count as an integer
    ///
    /// Stored counts may be negative; only new input is restricted to `u32`.
    pub fn bedrooms_value(&self) -> Option<i64> {
        self.bedrooms.trim().parse().ok()
    }

    /// Classify the status for display purposes
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::classify(&self.status)
    }
}

/// Render a price with a decimal point: integral values keep a trailing `.0`
/// (`250000.0`), others use the shortest exact form
fn format_price(price: f64) -> String {
    format!("{:?}", price)
}

/// Well-known listing states, used only to pick display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Available,
    Sold,
    Rented,
    /// Anything else; status values are never rejected
    Other,
}

impl StatusKind {
    /// Classify a status string, ignoring case and surrounding whitespace
    pub fn classify(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "available" => StatusKind::Available,
            "sold" => StatusKind::Sold,
            "rented" => StatusKind::Rented,
            _ => StatusKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_formats_numbers() {
        let property = Property::new(7, PropertyDetails::new("Elm St", 250000.0, 3, "Available"));
        assert_eq!(property.id, "7");
        assert_eq!(property.price, "250000.0");
        assert_eq!(property.bedrooms, "3");

        let property = Property::new(8, PropertyDetails::new("Oak Ave", 1999.5, 1, "Sold"));
        assert_eq!(property.price, "1999.5");
    }

    #[test]
    fn test_apply_keeps_id() {
        let mut property = Property::new(3, PropertyDetails::new("Elm St", 100.0, 2, "Available"));
        property.apply(PropertyDetails::new("Pine Rd", 200.0, 4, "Rented"));

        assert_eq!(property.id, "3");
        assert_eq!(property.location, "Pine Rd");
        assert_eq!(property.price_value(), Some(200.0));
        assert_eq!(property.bedrooms_value(), Some(4));
        assert_eq!(property.status, "Rented");
    }

    #[test]
    fn test_numeric_accessors_tolerate_garbage() {
        let property = Property {
            id: "x".to_string(),
            location: "Nowhere".to_string(),
            price: "call us".to_string(),
            bedrooms: " 2 ".to_string(),
            status: "".to_string(),
        };
        assert_eq!(property.id_value(), None);
        assert_eq!(property.price_value(), None);
        assert_eq!(property.bedrooms_value(), Some(2));
    }

    #[test]
    fn test_negative_bedrooms_are_numeric() {
        let mut property = Property::new(1, PropertyDetails::new("Elm St", 1.0, 0, ""));
        property.bedrooms = "-1".to_string();
        assert_eq!(property.bedrooms_value(), Some(-1));
    }

    #[test]
    fn test_numeric_id_detection() {
        let mut property = Property::new(1, PropertyDetails::new("Elm St", 1.0, 1, ""));
        assert!(property.is_numeric_id());

        property.id = "184467440737095516160".to_string();
        assert!(property.is_numeric_id());
        assert_eq!(property.id_value(), None);

        property.id = "A-12".to_string();
        assert!(!property.is_numeric_id());
        property.id = String::new();
        assert!(!property.is_numeric_id());
    }

    #[test]
    fn test_status_kind() {
        assert_eq!(StatusKind::classify("Available"), StatusKind::Available);
        assert_eq!(StatusKind::classify("SOLD"), StatusKind::Sold);
        assert_eq!(StatusKind::classify(" rented "), StatusKind::Rented);
        assert_eq!(StatusKind::classify("Under offer"), StatusKind::Other);
    }
}
