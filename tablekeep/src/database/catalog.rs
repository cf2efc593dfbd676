//! Restaurant and table storage.
//!
//! The engine never edits these records. External systems push them in with
//! the `upsert_*` methods and the allocator reads them back.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::restaurant::{Address, Restaurant, RestaurantId, Table, TableId};

use super::connection::Database;
use super::operations::to_nanos;

const SELECT_RESTAURANT: &str = r"
    SELECT id, name, phone, address, max_reservation_minutes, max_clients
    FROM restaurants
    WHERE id = ?
";

const UPSERT_RESTAURANT: &str = r"
    INSERT INTO restaurants (id, name, phone, address, max_reservation_minutes, max_clients)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        phone = excluded.phone,
        address = excluded.address,
        max_reservation_minutes = excluded.max_reservation_minutes,
        max_clients = excluded.max_clients
";

const UPSERT_TABLE: &str = r"
    INSERT INTO dining_tables (id, restaurant_id, table_number, number_of_seats, is_reserved)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(id) DO UPDATE SET
        restaurant_id = excluded.restaurant_id,
        table_number = excluded.table_number,
        number_of_seats = excluded.number_of_seats
";

const TABLE_COLUMNS: &str = "id, restaurant_id, table_number, number_of_seats, is_reserved";

fn row_to_restaurant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Restaurant> {
    let id: String = row.get(0)?;
    let address: Option<String> = row.get(3)?;
    let address = address
        .map(|yaml| serde_yaml::from_str::<Address>(&yaml))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(Restaurant {
        id: RestaurantId::new(id)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
        name: row.get(1)?,
        phone: row.get(2)?,
        address,
        max_reservation_minutes: row.get(4)?,
        max_clients: row.get(5)?,
    })
}

fn row_to_table(row: &rusqlite::Row<'_>) -> rusqlite::Result<Table> {
    let id: String = row.get(0)?;
    let restaurant_id: String = row.get(1)?;
    let convert = |e: Error| rusqlite::Error::ToSqlConversionFailure(Box::new(e));
    Ok(Table {
        id: TableId::new(id).map_err(convert)?,
        restaurant_id: RestaurantId::new(restaurant_id).map_err(convert)?,
        table_number: row.get(2)?,
        number_of_seats: row.get(3)?,
        is_reserved: row.get(4)?,
    })
}

impl Database {
    /// Inserts or replaces a restaurant record.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be serialized or the write fails.
    pub fn upsert_restaurant(&mut self, restaurant: &Restaurant) -> Result<()> {
        let address = restaurant
            .address
            .as_ref()
            .map(serde_yaml::to_string)
            .transpose()?;

        let tx = self.begin_immediate()?;
        tx.execute(
            UPSERT_RESTAURANT,
            params![
                restaurant.id.as_str(),
                restaurant.name,
                restaurant.phone,
                address,
                restaurant.max_reservation_minutes,
                restaurant.max_clients,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts or replaces a table record. The advisory `is_reserved` flag
    /// of an existing table is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the restaurant is unknown or the
    /// seat count is zero, or a database error if the write fails (for
    /// instance a duplicate table number within the restaurant).
    pub fn upsert_table(&mut self, table: &Table) -> Result<()> {
        if table.number_of_seats == 0 {
            return Err(Error::Validation {
                field: "number_of_seats".into(),
                message: format!("table {} must seat at least one guest", table.id),
            });
        }

        let tx = self.begin_immediate()?;
        if Self::find_restaurant(&tx, &table.restaurant_id)?.is_none() {
            return Err(Error::Validation {
                field: "restaurant_id".into(),
                message: format!(
                    "table {} references unknown restaurant {}",
                    table.id, table.restaurant_id
                ),
            });
        }
        tx.execute(
            UPSERT_TABLE,
            params![
                table.id.as_str(),
                table.restaurant_id.as_str(),
                table.table_number,
                table.number_of_seats,
                table.is_reserved,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Looks up a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_restaurant(conn: &Connection, id: &RestaurantId) -> Result<Option<Restaurant>> {
        conn.query_row(SELECT_RESTAURANT, [id.as_str()], row_to_restaurant)
            .optional()
            .map_err(Error::from)
    }

    /// Lists every restaurant, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_restaurants(conn: &Connection) -> Result<Vec<Restaurant>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, address, max_reservation_minutes, max_clients
             FROM restaurants ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_restaurant)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::from)
    }

    /// Looks up a table by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_table(conn: &Connection, id: &TableId) -> Result<Option<Table>> {
        conn.query_row(
            &format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = ?"),
            [id.as_str()],
            row_to_table,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Lists a restaurant's tables by table number, optionally filtered on
    /// the advisory `is_reserved` flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(
        conn: &Connection,
        restaurant_id: &RestaurantId,
        is_reserved: Option<bool>,
    ) -> Result<Vec<Table>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables
             WHERE restaurant_id = ?1 AND (?2 IS NULL OR is_reserved = ?2)
             ORDER BY table_number"
        ))?;
        let rows = stmt.query_map(params![restaurant_id.as_str(), is_reserved], row_to_table)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::from)
    }

    /// Recomputes the advisory `is_reserved` flag for every table: set when
    /// a live reservation's window contains `now`, cleared otherwise.
    ///
    /// Returns the number of tables whose flag changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn refresh_table_occupancy(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let tx = self.begin_immediate()?;
        let changed = tx.execute(
            "UPDATE dining_tables
             SET is_reserved = occupied
             FROM (
                 SELECT t.id AS table_id,
                        EXISTS (
                            SELECT 1 FROM reservations r
                            WHERE r.table_id = t.id AND r.status != 'cancelled'
                              AND r.start_time <= ?1 AND r.end_time > ?1
                        ) AS occupied
                 FROM dining_tables t
             ) AS live
             WHERE dining_tables.id = live.table_id AND dining_tables.is_reserved != live.occupied",
            [to_nanos(now)?],
        )?;
        tx.commit()?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{at, create_test_database, seed_restaurant, test_reservation};

    #[test]
    fn test_upsert_and_find_restaurant() {
        let mut db = create_test_database();
        let mut restaurant = Restaurant {
            id: RestaurantId::new("r-1").unwrap(),
            name: "Cantina".into(),
            phone: Some("555-0100".into()),
            address: Some(Address {
                street: "Rua A".into(),
                number: "10".into(),
                district: "Centro".into(),
                city: "Recife".into(),
                state: "PE".into(),
            }),
            max_reservation_minutes: Some(120),
            max_clients: None,
        };
        db.upsert_restaurant(&restaurant).unwrap();

        let loaded = Database::find_restaurant(db.connection(), &restaurant.id)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, restaurant);

        restaurant.name = "Cantina Nova".into();
        db.upsert_restaurant(&restaurant).unwrap();
        let loaded = Database::find_restaurant(db.connection(), &restaurant.id)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.name, "Cantina Nova");
        assert_eq!(Database::list_restaurants(db.connection()).unwrap().len(), 1);
    }

    #[test]
    fn test_table_requires_known_restaurant() {
        let mut db = create_test_database();
        let table = Table {
            id: TableId::new("t-1").unwrap(),
            restaurant_id: RestaurantId::new("ghost").unwrap(),
            table_number: 1,
            number_of_seats: 2,
            is_reserved: false,
        };
        let err = db.upsert_table(&table).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "restaurant_id"));
    }

    #[test]
    fn test_list_tables_ordered_and_filtered() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(5, 4), (3, 4), (1, 2)]);
        let restaurant = RestaurantId::new("r-1").unwrap();

        let tables = Database::list_tables(db.connection(), &restaurant, None).unwrap();
        let numbers: Vec<u32> = tables.iter().map(|t| t.table_number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);

        let reserved = Database::list_tables(db.connection(), &restaurant, Some(true)).unwrap();
        assert!(reserved.is_empty());
    }

    #[test]
    fn test_refresh_table_occupancy() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4), (2, 4)]);
        let booking = test_reservation("r-1", Some("r-1-t1"), at(19, 0), at(21, 0), 2);
        db.create_reservation(&booking).unwrap();

        assert_eq!(db.refresh_table_occupancy(at(20, 0)).unwrap(), 1);
        let t1 = Database::find_table(db.connection(), &TableId::new("r-1-t1").unwrap())
            .unwrap()
            .unwrap();
        assert!(t1.is_reserved);

        // Unchanged state touches nothing.
        assert_eq!(db.refresh_table_occupancy(at(20, 30)).unwrap(), 0);

        assert_eq!(db.refresh_table_occupancy(at(21, 0)).unwrap(), 1);
        let t1 = Database::find_table(db.connection(), &TableId::new("r-1-t1").unwrap())
            .unwrap()
            .unwrap();
        assert!(!t1.is_reserved);
    }
}
