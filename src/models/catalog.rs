use super::property::{Property, PropertyDetails};
use super::query::{SearchCriteria, SortKey, SortOrder};

/// Errors raised while assigning IDs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("ID space exhausted: property {highest} already uses the largest assignable ID")]
    IdsExhausted { highest: String },
}

/// In-memory property collection, kept in file (insertion) order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    properties: Vec<Property>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Catalog {
            properties: Vec::new(),
        }
    }

    /// Wrap properties loaded from storage, preserving their order
    pub fn from_properties(properties: Vec<Property>) -> Self {
        Catalog { properties }
    }

    /// Next ID to assign: highest numeric ID plus one, or 1 when empty
    ///
    /// Non-numeric IDs are ignored. Deleting the highest record frees its ID
    /// for reuse. Fails when the highest ID is `u64::MAX` or a digit string
    /// too long to count past.
    pub fn next_id(&self) -> Result<u64, CatalogError> {
        let mut highest: Option<u64> = None;
        for property in &self.properties {
            match property.id_value() {
                Some(id) => highest = highest.max(Some(id)),
                None if property.is_numeric_id() => {
                    return Err(CatalogError::IdsExhausted {
                        highest: property.id.clone(),
                    });
                }
                None => {}
            }
        }

        match highest {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| CatalogError::IdsExhausted {
                highest: max.to_string(),
            }),
        }
    }

    /// Append a new property and return it
    pub fn add(&mut self, details: PropertyDetails) -> Result<&Property, CatalogError> {
        let id = self.next_id()?;
        self.properties.push(Property::new(id, details));
        log::debug!("Added property {}", id);
        Ok(&self.properties[self.properties.len() - 1])
    }

    /// Replace the editable fields of the first property with this ID
    /// Returns false when no property matches
    pub fn update(&mut self, id: &str, details: PropertyDetails) -> bool {
        match self.get_mut(id) {
            Some(property) => {
                property.apply(details);
                log::debug!("Updated property {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every property with this ID
    /// Returns false when nothing was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p.id != id);
        let removed = before - self.properties.len();
        if removed > 0 {
            log::debug!("Removed {} record(s) with ID {}", removed, id);
        }
        removed > 0
    }

    /// Get property by ID
    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Get mutable property by ID
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.id == id)
    }

    /// Lazily filter properties by the given criteria, in file order
    pub fn search<'a>(
        &'a self,
        criteria: &'a SearchCriteria,
    ) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties.iter().filter(move |p| criteria.matches(p))
    }

    /// Properties ordered by a numeric key, without touching stored order
    /// The sort is stable: equal keys keep file order in both directions.
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<&Property> {
        let mut view: Vec<&Property> = self.properties.iter().collect();
        view.sort_by(|a, b| order.compare(key.value(a), key.value(b)));
        view
    }

    /// Get the number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Get a reference to all properties
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Consume the catalog, returning the properties
    pub fn into_properties(self) -> Vec<Property> {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(location: &str, price: f64, bedrooms: u32) -> PropertyDetails {
        PropertyDetails::new(location, price, bedrooms, "Available")
    }

    fn catalog_with_prices(prices: &[&str]) -> Catalog {
        let properties = prices
            .iter()
            .enumerate()
            .map(|(i, price)| Property {
                id: (i + 1).to_string(),
                location: format!("Lot {}", i + 1),
                price: price.to_string(),
                bedrooms: "1".to_string(),
                status: "Available".to_string(),
            })
            .collect();
        Catalog::from_properties(properties)
    }

    fn prices(view: &[&Property]) -> Vec<String> {
        view.iter().map(|p| p.price.clone()).collect()
    }

    fn ids(view: &[&Property]) -> Vec<String> {
        view.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.next_id(), Ok(1));

        for n in 1..=5 {
            let added = catalog.add(details("Elm St", 1000.0, 2)).unwrap();
            assert_eq!(added.id, n.to_string());
        }

        let ids: Vec<&str> = catalog.properties().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_next_id_uses_max_not_len() {
        let mut catalog = Catalog::new();
        catalog.add(details("a", 1.0, 1)).unwrap();
        catalog.add(details("b", 1.0, 1)).unwrap();
        catalog.add(details("c", 1.0, 1)).unwrap();
        assert!(catalog.remove("2"));

        // Two records remain but the highest ID is 3
        assert_eq!(catalog.next_id(), Ok(4));
    }

    #[test]
    fn test_next_id_ignores_non_numeric_ids() {
        let mut catalog = catalog_with_prices(&["1", "2"]);
        catalog.get_mut("2").unwrap().id = "legacy".to_string();
        assert_eq!(catalog.next_id(), Ok(2));
    }

    #[test]
    fn test_next_id_fails_at_the_top_of_the_id_space() {
        let mut catalog = catalog_with_prices(&["1"]);
        catalog.get_mut("1").unwrap().id = u64::MAX.to_string();
        assert_eq!(
            catalog.next_id(),
            Err(CatalogError::IdsExhausted {
                highest: "18446744073709551615".to_string()
            })
        );

        let before = catalog.clone();
        assert!(catalog.add(details("Elm St", 1.0, 1)).is_err());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_next_id_fails_on_digit_ids_beyond_u64() {
        let mut catalog = catalog_with_prices(&["1", "2"]);
        catalog.get_mut("2").unwrap().id = "99999999999999999999".to_string();
        assert!(matches!(
            catalog.next_id(),
            Err(CatalogError::IdsExhausted { highest }) if highest == "99999999999999999999"
        ));
    }

    #[test]
    fn test_update_changes_only_target() {
        let mut catalog = Catalog::new();
        catalog.add(details("Elm St", 100.0, 1)).unwrap();
        catalog.add(details("Oak Ave", 200.0, 2)).unwrap();
        let untouched = catalog.get("1").cloned();

        let updated = catalog.update(
            "2",
            PropertyDetails::new("Pine Rd", 300.0, 3, "Sold"),
        );
        assert!(updated);

        let property = catalog.get("2").unwrap();
        assert_eq!(property.id, "2");
        assert_eq!(property.location, "Pine Rd");
        assert_eq!(property.price, "300.0");
        assert_eq!(property.bedrooms, "3");
        assert_eq!(property.status, "Sold");
        assert_eq!(catalog.get("1").cloned(), untouched);
    }

    #[test]
    fn test_update_missing_returns_false() {
        let mut catalog = catalog_with_prices(&["10"]);
        let before = catalog.clone();
        assert!(!catalog.update("99", details("x", 1.0, 1)));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        let mut catalog = catalog_with_prices(&["10", "20", "30", "40"]);
        assert!(catalog.remove("2"));

        let ids: Vec<&str> = catalog.properties().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
        assert!(!catalog.remove("2"));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_search_price_range() {
        let catalog = catalog_with_prices(&["50", "100", "150", "200", "250"]);
        let criteria = SearchCriteria::Price { min: 100.0, max: 200.0 };

        let found: Vec<&str> = catalog.search(&criteria).map(|p| p.price.as_str()).collect();
        assert_eq!(found, vec!["100", "150", "200"]);
    }

    #[test]
    fn test_search_bedrooms_range() {
        let mut catalog = Catalog::new();
        catalog.add(details("a", 1.0, 1)).unwrap();
        catalog.add(details("b", 1.0, 3)).unwrap();
        catalog.add(details("c", 1.0, 5)).unwrap();

        let criteria = SearchCriteria::Bedrooms { min: 2, max: 5 };
        let found: Vec<&str> = catalog.search(&criteria).map(|p| p.id.as_str()).collect();
        assert_eq!(found, vec!["2", "3"]);
    }

    #[test]
    fn test_sort_is_numeric_not_lexicographic() {
        let catalog = catalog_with_prices(&["100", "20", "5"]);

        let ascending = catalog.sorted(SortKey::Price, SortOrder::Ascending);
        assert_eq!(prices(&ascending), vec!["5", "20", "100"]);

        let descending = catalog.sorted(SortKey::Price, SortOrder::Descending);
        assert_eq!(prices(&descending), vec!["100", "20", "5"]);

        // Stored order is untouched
        assert_eq!(catalog.properties()[0].price, "100");
    }

    #[test]
    fn test_sort_orders_negative_bedrooms_numerically() {
        let mut catalog = catalog_with_prices(&["1", "1", "1"]);
        for (id, bedrooms) in [("1", "2"), ("2", "-1"), ("3", "10")] {
            catalog.get_mut(id).unwrap().bedrooms = bedrooms.to_string();
        }

        let beds: Vec<&str> = catalog
            .sorted(SortKey::Bedrooms, SortOrder::Ascending)
            .into_iter()
            .map(|p| p.bedrooms.as_str())
            .collect();
        assert_eq!(beds, vec!["-1", "2", "10"]);

        let criteria = SearchCriteria::Bedrooms { min: -1, max: 2 };
        let found: Vec<&str> = catalog.search(&criteria).map(|p| p.id.as_str()).collect();
        assert_eq!(found, vec!["1", "2"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let catalog = catalog_with_prices(&["10", "5", "10", "5"]);

        assert_eq!(
            ids(&catalog.sorted(SortKey::Price, SortOrder::Ascending)),
            vec!["2", "4", "1", "3"]
        );
        assert_eq!(
            ids(&catalog.sorted(SortKey::Price, SortOrder::Descending)),
            vec!["1", "3", "2", "4"]
        );
    }

    #[test]
    fn test_sort_puts_unparseable_last() {
        let catalog = catalog_with_prices(&["n/a", "20", "5"]);
        let descending = catalog.sorted(SortKey::Price, SortOrder::Descending);
        assert_eq!(prices(&descending), vec!["20", "5", "n/a"]);
    }
}
