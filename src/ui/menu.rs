use std::io::{BufRead, Write};

use super::prompt::{PromptError, Prompter};
use super::status::StatusPainter;
use super::table;
use crate::manager::{OperationError, PropertyManager};
use crate::models::{CriteriaKind, Property, PropertyDetails, SearchCriteria, SortKey, SortOrder};
use crate::storage::PropertyStore;

const MENU: &[&str] = &[
    "View All Properties",
    "Add New Property",
    "Update Property",
    "Delete Property",
    "Search Property",
    "Sort Properties",
    "Export Report",
    "Exit",
];

/// Failure of one menu action
#[derive(Debug, thiserror::Error)]
enum ActionError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// What the loop does after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive numbered menu over a property manager
pub struct Menu<'a, S: PropertyStore, R, W> {
    manager: &'a PropertyManager<S>,
    painter: &'a StatusPainter,
    prompter: Prompter<R, W>,
}

impl<'a, S: PropertyStore, R: BufRead, W: Write> Menu<'a, S, R, W> {
    pub fn new(
        manager: &'a PropertyManager<S>,
        painter: &'a StatusPainter,
        input: R,
        output: W,
    ) -> Self {
        Menu {
            manager,
            painter,
            prompter: Prompter::new(input, output),
        }
    }

    /// Run until the user exits or input ends
    ///
    /// Operation failures are reported and the loop continues; only console
    /// I/O errors end the session with an error.
    pub fn run(mut self) -> Result<(), PromptError> {
        loop {
            self.print_menu()?;
            let choice = match self.prompter.text("Choose an option: ") {
                Ok(choice) => choice,
                Err(PromptError::Eof) => {
                    log::debug!("Input closed, leaving menu");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(ActionError::Operation(e)) => {
                    log::error!("Operation failed: {}", e);
                    self.prompter.say(format!("Error: {}", e))?;
                }
                Err(ActionError::Prompt(PromptError::Eof)) => {
                    log::debug!("Input closed mid-action, leaving menu");
                    return Ok(());
                }
                Err(ActionError::Prompt(e)) => return Err(e),
            }
        }
    }

    fn print_menu(&mut self) -> Result<(), PromptError> {
        self.prompter.say("\nReal Estate Manager")?;
        for (i, label) in MENU.iter().enumerate() {
            self.prompter.say(format!("{}. {}", i + 1, label))?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow, ActionError> {
        match choice {
            "1" => self.view()?,
            "2" => self.add()?,
            "3" => self.update()?,
            "4" => self.delete()?,
            "5" => self.search()?,
            "6" => self.sort()?,
            "7" => self.export()?,
            "8" => {
                self.prompter.say("Exiting... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            _ => self.prompter.say("Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    fn print_table(&mut self, properties: &[Property]) -> Result<(), PromptError> {
        self.prompter.say(format!("\n{}", table::header()))?;
        self.prompter.say(table::separator())?;
        for property in properties {
            let status = self.painter.paint(&property.status);
            self.prompter.say(table::row(property, status))?;
        }
        Ok(())
    }

    fn view(&mut self) -> Result<(), ActionError> {
        let catalog = self.manager.list()?;
        if catalog.is_empty() {
            self.prompter.say("No properties found.")?;
        } else {
            self.print_table(catalog.properties())?;
        }
        Ok(())
    }

    fn read_details(&mut self, label: &str) -> Result<PropertyDetails, PromptError> {
        let location = self.prompter.text(&format!("{}Location: ", label))?;
        let price = self
            .prompter
            .number_where(&format!("{}Price ($): ", label), |p: &f64| p.is_finite())?;
        let bedrooms = self.prompter.number(&format!("{}Bedrooms: ", label))?;
        let status = self
            .prompter
            .text(&format!("{}Status (Available/Sold/Rented): ", label))?;
        Ok(PropertyDetails::new(location, price, bedrooms, status))
    }

    fn add(&mut self) -> Result<(), ActionError> {
        let details = self.read_details("")?;
        let added = self.manager.add(details)?;
        self.prompter.say(format!("Property added! (ID {})", added.id))?;
        Ok(())
    }

    fn update(&mut self) -> Result<(), ActionError> {
        self.view()?;
        let id = self.prompter.text("\nEnter Property ID to update: ")?;
        let id = id.trim();

        // Check first so the user is not asked for fields of a missing record
        if self.manager.get(id)?.is_none() {
            self.prompter.say("Property not found.")?;
            return Ok(());
        }

        let details = self.read_details("New ")?;
        if self.manager.update(id, details)? {
            self.prompter.say("Property updated.")?;
        } else {
            self.prompter.say("Property not found.")?;
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<(), ActionError> {
        self.view()?;
        let id = self.prompter.text("\nEnter Property ID to delete: ")?;
        if self.manager.delete(id.trim())? {
            self.prompter.say("Property deleted.")?;
        } else {
            self.prompter.say("Property not found.")?;
        }
        Ok(())
    }

    fn search(&mut self) -> Result<(), ActionError> {
        let answer = self
            .prompter
            .text("Search by (location/price/status/bedrooms): ")?;
        let kind: CriteriaKind = match answer.parse() {
            Ok(kind) => kind,
            Err(e) => {
                log::debug!("{}", e);
                self.prompter.say("Invalid criteria.")?;
                return Ok(());
            }
        };

        let criteria = match kind {
            CriteriaKind::Location => {
                SearchCriteria::location(&self.prompter.text("Enter location keyword: ")?)
            }
            CriteriaKind::Price => SearchCriteria::Price {
                min: self.prompter.number("Min Price: ")?,
                max: self.prompter.number("Max Price: ")?,
            },
            CriteriaKind::Status => SearchCriteria::status(&self.prompter.text("Enter status: ")?),
            CriteriaKind::Bedrooms => SearchCriteria::Bedrooms {
                min: self.prompter.number("Min Bedrooms: ")?,
                max: self.prompter.number("Max Bedrooms: ")?,
            },
        };

        let found = self.manager.search(&criteria)?;
        self.prompter.say("\nSearch Results:")?;
        if found.is_empty() {
            self.prompter.say("No matching properties found.")?;
        } else {
            self.print_table(&found)?;
        }
        Ok(())
    }

    fn sort(&mut self) -> Result<(), ActionError> {
        let answer = self.prompter.text("Sort by (price/bedrooms): ")?;
        let descending = self.prompter.confirm("Descending? (y/n): ")?;
        let key: SortKey = match answer.parse() {
            Ok(key) => key,
            Err(e) => {
                log::debug!("{}", e);
                self.prompter.say("Invalid sort key.")?;
                return Ok(());
            }
        };

        let sorted = self
            .manager
            .sort(key, SortOrder::from_descending(descending))?;
        self.print_table(&sorted)?;
        Ok(())
    }

    fn export(&mut self) -> Result<(), ActionError> {
        let rows = self.manager.export()?;
        self.prompter.say(format!(
            "Report with {} properties saved to {}",
            rows,
            self.manager.report_path().display()
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BackupPolicy, CsvPropertyStore, TextReport};
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> PropertyManager<CsvPropertyStore> {
        PropertyManager::new(
            CsvPropertyStore::new(dir.path().join("properties.csv"), BackupPolicy::Required),
            TextReport::new(dir.path().join("property_report.txt")),
        )
    }

    fn run_session(manager: &PropertyManager<CsvPropertyStore>, input: &str) -> String {
        let painter = StatusPainter::plain();
        let mut output = Vec::new();
        Menu::new(manager, &painter, input.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_invalid_choice_reprompts_and_exit_stops() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        let output = run_session(&manager, "9\nabc\n8\n1\n");
        assert_eq!(output.matches("Invalid choice.").count(), 2);
        assert!(output.ends_with("Exiting... Goodbye!\n"));
        assert_eq!(output.matches("Choose an option: ").count(), 3);
    }

    #[test]
    fn test_add_with_bad_numbers_then_view() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        let output = run_session(
            &manager,
            "2\nElm St\nlots\n250000\nthree\n3\nAvailable\n1\n8\n",
        );
        assert_eq!(output.matches("Invalid input. Please enter a number.").count(), 2);
        assert!(output.contains("Property added! (ID 1)"));
        assert!(output.contains("1    Elm St              $250000.0  3      Available"));

        let stored = manager.get("1").unwrap().unwrap();
        assert_eq!(stored.price, "250000.0");
    }

    #[test]
    fn test_update_and_delete_flow() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager
            .add(PropertyDetails::new("Elm St", 100.0, 2, "Available"))
            .unwrap();

        let output = run_session(
            &manager,
            "3\n7\n3\n1\nOak Ave\n150\n4\nSold\n4\n9\n8\n",
        );
        assert_eq!(output.matches("Property not found.").count(), 2);
        assert!(output.contains("Property updated."));

        let updated = manager.get("1").unwrap().unwrap();
        assert_eq!(updated.location, "Oak Ave");
        assert_eq!(updated.status, "Sold");

        run_session(&manager, "4\n1\n8\n");
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_search_and_sort() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        for (location, price) in [("Elm St", 100.0), ("Oak Ave", 20.0), ("Elm Court", 5.0)] {
            manager
                .add(PropertyDetails::new(location, price, 2, "Available"))
                .unwrap();
        }

        let output = run_session(&manager, "5\nlocation\nelm\n5\ngarage\n8\n");
        assert!(output.contains("Elm St"));
        assert!(output.contains("Elm Court"));
        assert!(!output.contains("Oak Ave"));
        assert!(output.contains("Invalid criteria."));

        let output = run_session(&manager, "6\nprice\nn\n6\nstatus\ny\n8\n");
        let elm_court = output.find("Elm Court").unwrap();
        let oak = output.find("Oak Ave").unwrap();
        let elm_st = output.find("Elm St").unwrap();
        assert!(elm_court < oak && oak < elm_st);
        assert!(output.contains("Invalid sort key."));
    }

    #[test]
    fn test_search_without_matches() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        let output = run_session(&manager, "5\nprice\n1\n2\n8\n");
        assert!(output.contains("No matching properties found."));
    }

    #[test]
    fn test_eof_ends_session_cleanly() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        let output = run_session(&manager, "2\nElm St\n");
        assert!(!output.contains("Property added"));
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_export() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager
            .add(PropertyDetails::new("Elm St", 100.0, 2, "Available"))
            .unwrap();

        let output = run_session(&manager, "7\n8\n");
        assert!(output.contains("Report with 1 properties saved to"));
        assert!(manager.report_path().exists());
    }
}
