//! Load-operate-save cycles over a property store
//!
//! Every call re-reads the store, so nothing is cached between operations.
//! Mutations write the whole collection back; reads never touch the file.

use std::path::Path;

use crate::models::{
    Catalog, CatalogError, Property, PropertyDetails, QueryError, SearchCriteria, SortKey,
    SortOrder,
};
use crate::storage::{PropertyStore, ReportError, StoreError, TextReport};

/// Any failure of a single property operation
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Property operations on top of a store and a report target
pub struct PropertyManager<S: PropertyStore> {
    store: S,
    report: TextReport,
}

impl<S: PropertyStore> PropertyManager<S> {
    pub fn new(store: S, report: TextReport) -> Self {
        PropertyManager { store, report }
    }

    /// All properties in file order
    pub fn list(&self) -> Result<Catalog, OperationError> {
        Ok(self.store.load()?)
    }

    /// Look up a single property
    pub fn get(&self, id: &str) -> Result<Option<Property>, OperationError> {
        Ok(self.store.load()?.get(id).cloned())
    }

    /// Add a property with the next free ID and persist it
    pub fn add(&self, details: PropertyDetails) -> Result<Property, OperationError> {
        let mut catalog = self.store.load()?;
        let added = catalog.add(details)?.clone();
        self.store.save(&catalog)?;
        log::info!("Added property {} ({})", added.id, added.location);
        Ok(added)
    }

    /// Replace the editable fields of a property
    /// Returns false, without writing, when the ID is unknown
    pub fn update(&self, id: &str, details: PropertyDetails) -> Result<bool, OperationError> {
        let mut catalog = self.store.load()?;
        if !catalog.update(id, details) {
            log::info!("Update skipped: property {} not found", id);
            return Ok(false);
        }
        self.store.save(&catalog)?;
        log::info!("Updated property {}", id);
        Ok(true)
    }

    /// Delete a property
    /// Returns false, without writing, when the ID is unknown
    pub fn delete(&self, id: &str) -> Result<bool, OperationError> {
        let mut catalog = self.store.load()?;
        if !catalog.remove(id) {
            log::info!("Delete skipped: property {} not found", id);
            return Ok(false);
        }
        self.store.save(&catalog)?;
        log::info!("Deleted property {}", id);
        Ok(true)
    }

    /// Properties matching the criteria, in file order
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Property>, OperationError> {
        let catalog = self.store.load()?;
        let found: Vec<Property> = catalog.search(criteria).cloned().collect();
        log::debug!("Search {:?} matched {} properties", criteria, found.len());
        Ok(found)
    }

    /// All properties ordered by a numeric key; the stored order is unchanged
    pub fn sort(&self, key: SortKey, order: SortOrder) -> Result<Vec<Property>, OperationError> {
        let catalog = self.store.load()?;
        Ok(catalog.sorted(key, order).into_iter().cloned().collect())
    }

    /// Write the fixed-width report, returning the number of rows
    pub fn export(&self) -> Result<usize, OperationError> {
        let catalog = self.store.load()?;
        Ok(self.report.write(&catalog)?)
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    pub fn report_path(&self) -> &Path {
        self.report.path()
    }
}
