//! Import of restaurant and table records from a YAML catalog.
//!
//! The catalog is owned elsewhere; importing only upserts. Nothing is
//! deleted, and records missing from the file are left as they are.
//!
//! ```yaml
//! restaurants:
//!   - id: cantina
//!     name: Cantina da Praia
//!     phone: "+55 81 5555-0100"
//!     max_reservation_minutes: 120
//!     address: { street: Rua da Aurora, number: "10", city: Recife }
//!     tables:
//!       - { number: 1, seats: 2 }
//!       - { number: 2, seats: 4 }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::restaurant::{Address, Restaurant, RestaurantId, Table, TableId};

/// A catalog file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Restaurants to import.
    #[serde(default)]
    pub restaurants: Vec<CatalogRestaurant>,
}

/// One restaurant and its tables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogRestaurant {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Maximum booking length in minutes.
    #[serde(default)]
    pub max_reservation_minutes: Option<u32>,
    /// Capacity hint.
    #[serde(default)]
    pub max_clients: Option<u32>,
    /// Tables.
    #[serde(default)]
    pub tables: Vec<CatalogTable>,
}

/// One table. The id defaults to `{restaurant}-t{number}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogTable {
    /// Explicit table id.
    #[serde(default)]
    pub id: Option<String>,
    /// Table number.
    pub number: u32,
    /// Seats.
    pub seats: u32,
}

/// Counts of upserted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedResult {
    /// Restaurants written.
    pub restaurants: usize,
    /// Tables written.
    pub tables: usize,
}

impl Catalog {
    /// Parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::Validation`] naming the file if it is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| Error::Validation {
            field: path.display().to_string(),
            message: format!("invalid catalog: {e}"),
        })
    }

    /// Upserts every restaurant and table into `db`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty id or a zero-seat table,
    /// or a database error if a write fails.
    pub fn import(&self, db: &mut Database) -> Result<SeedResult> {
        let mut result = SeedResult::default();

        for entry in &self.restaurants {
            let restaurant_id = RestaurantId::new(entry.id.as_str())?;
            db.upsert_restaurant(&Restaurant {
                id: restaurant_id.clone(),
                name: entry.name.clone(),
                phone: entry.phone.clone(),
                address: entry.address.clone(),
                max_reservation_minutes: entry.max_reservation_minutes,
                max_clients: entry.max_clients,
            })?;
            result.restaurants += 1;

            for table in &entry.tables {
                if table.seats == 0 {
                    return Err(Error::Validation {
                        field: "seats".into(),
                        message: format!(
                            "table {} of {} has no seats",
                            table.number, entry.id
                        ),
                    });
                }
                let id = table
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}-t{}", entry.id, table.number));
                db.upsert_table(&Table {
                    id: TableId::new(id)?,
                    restaurant_id: restaurant_id.clone(),
                    table_number: table.number,
                    number_of_seats: table.seats,
                    is_reserved: false,
                })?;
                result.tables += 1;
            }
            log::debug!("imported {} with {} table(s)", entry.id, entry.tables.len());
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = r#"
restaurants:
  - id: cantina
    name: Cantina
    phone: "555-0100"
    max_reservation_minutes: 90
    address: { street: Rua A, number: "10", city: Recife }
    tables:
      - { number: 1, seats: 2 }
      - { id: patio-7, number: 7, seats: 6 }
  - id: bistro
    name: Bistro
"#;

    #[test]
    fn test_import_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, CATALOG).unwrap();
        let mut db = create_test_database();

        let result = Catalog::load(&path).unwrap().import(&mut db).unwrap();
        assert_eq!(result, SeedResult { restaurants: 2, tables: 2 });

        let cantina = RestaurantId::new("cantina").unwrap();
        let stored = Database::find_restaurant(db.connection(), &cantina)
            .unwrap()
            .unwrap();
        assert_eq!(stored.max_reservation_minutes, Some(90));
        assert_eq!(stored.address.unwrap().city, "Recife");

        let tables = Database::list_tables(db.connection(), &cantina, None).unwrap();
        let ids: Vec<_> = tables.iter().map(|t| t.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["cantina-t1", "patio-7"]);
    }

    #[test]
    fn test_reimport_updates_in_place() {
        let mut db = create_test_database();
        let mut catalog: Catalog = serde_yaml::from_str(CATALOG).unwrap();
        catalog.import(&mut db).unwrap();

        catalog.restaurants[0].tables[0].seats = 4;
        catalog.import(&mut db).unwrap();

        let table = Database::find_table(db.connection(), &TableId::new("cantina-t1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(table.number_of_seats, 4);
    }

    #[test]
    fn test_zero_seats_rejected() {
        let mut db = create_test_database();
        let catalog: Catalog = serde_yaml::from_str(
            "restaurants:\n  - id: r\n    name: R\n    tables:\n      - { number: 1, seats: 0 }\n",
        )
        .unwrap();
        assert!(matches!(
            catalog.import(&mut db),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, "restaurants: []\nchefs: []\n").unwrap();
        assert!(matches!(Catalog::load(&path), Err(Error::Validation { .. })));
    }
}
