//! Best-fit table selection.
//!
//! The allocator picks the smallest table that seats the party and is free
//! for the whole window. Ties on seat count go to the lowest table number,
//! so the same request against the same state always yields the same table.

use rusqlite::Connection;

use crate::availability::AvailabilityChecker;
use crate::database::Database;
use crate::error::Result;
use crate::restaurant::{RestaurantId, Table};
use crate::window::ReservationWindow;

/// Chooses a table for a party.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAllocator;

impl TableAllocator {
    /// Returns the best-fit free table, or `None` when nothing qualifies.
    ///
    /// The advisory `is_reserved` flag is ignored; only stored reservations
    /// decide availability. Run this on the same transaction as the insert
    /// that books the returned table.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn find_available_table(
        conn: &Connection,
        restaurant_id: &RestaurantId,
        party_size: u32,
        window: &ReservationWindow,
    ) -> Result<Option<Table>> {
        let candidates = Self::rank_candidates(
            Database::list_tables(conn, restaurant_id, None)?,
            party_size,
        );

        for table in candidates {
            if !AvailabilityChecker::has_conflict(conn, &table.id, window, None)? {
                log::debug!(
                    "allocated table {} ({} seats) for party of {party_size} in {window}",
                    table.table_number,
                    table.number_of_seats
                );
                return Ok(Some(table));
            }
        }

        log::debug!("no table at {restaurant_id} fits party of {party_size} in {window}");
        Ok(None)
    }

    /// Keeps tables that seat the party, smallest first, then by table number.
    #[must_use]
    pub fn rank_candidates(tables: Vec<Table>, party_size: u32) -> Vec<Table> {
        let mut fitting: Vec<Table> = tables.into_iter().filter(|t| t.fits(party_size)).collect();
        fitting.sort_by_key(|t| (t.number_of_seats, t.table_number));
        fitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{at, create_test_database, seed_restaurant, test_reservation};
    use crate::restaurant::TableId;

    fn table(number: u32, seats: u32) -> Table {
        Table {
            id: TableId::new(format!("t{number}")).unwrap(),
            restaurant_id: RestaurantId::new("r-1").unwrap(),
            table_number: number,
            number_of_seats: seats,
            is_reserved: false,
        }
    }

    #[test]
    fn test_rank_candidates_best_fit() {
        let ranked = TableAllocator::rank_candidates(
            vec![table(1, 8), table(5, 4), table(2, 2), table(3, 4), table(4, 6)],
            3,
        );
        let numbers: Vec<u32> = ranked.iter().map(|t| t.table_number).collect();
        assert_eq!(numbers, vec![3, 5, 4, 1]);
    }

    #[test]
    fn test_picks_smallest_fitting_table() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 8), (2, 2), (3, 4)]);
        let window = ReservationWindow::new(at(19, 0), at(21, 0)).unwrap();
        let restaurant = RestaurantId::new("r-1").unwrap();

        let chosen = TableAllocator::find_available_table(db.connection(), &restaurant, 3, &window)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.table_number, 3);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(5, 4), (3, 4)]);
        let window = ReservationWindow::new(at(19, 0), at(21, 0)).unwrap();
        let restaurant = RestaurantId::new("r-1").unwrap();

        for _ in 0..5 {
            let chosen =
                TableAllocator::find_available_table(db.connection(), &restaurant, 4, &window)
                    .unwrap()
                    .unwrap();
            assert_eq!(chosen.table_number, 3);
        }
    }

    #[test]
    fn test_skips_booked_table() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(3, 4), (5, 4)]);
        let booked = test_reservation("r-1", Some("r-1-t3"), at(19, 0), at(21, 0), 4);
        db.create_reservation(&booked).unwrap();

        let window = ReservationWindow::new(at(20, 0), at(22, 0)).unwrap();
        let restaurant = RestaurantId::new("r-1").unwrap();
        let chosen = TableAllocator::find_available_table(db.connection(), &restaurant, 2, &window)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.table_number, 5);
    }

    #[test]
    fn test_none_when_party_too_large_or_all_booked() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        let window = ReservationWindow::new(at(19, 0), at(21, 0)).unwrap();
        let restaurant = RestaurantId::new("r-1").unwrap();

        assert!(
            TableAllocator::find_available_table(db.connection(), &restaurant, 5, &window)
                .unwrap()
                .is_none()
        );

        let booked = test_reservation("r-1", Some("r-1-t1"), at(19, 0), at(21, 0), 4);
        db.create_reservation(&booked).unwrap();
        assert!(
            TableAllocator::find_available_table(db.connection(), &restaurant, 2, &window)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_ignores_advisory_flag() {
        let mut db = create_test_database();
        seed_restaurant(&mut db, "r-1", &[(1, 4)]);
        db.connection()
            .execute("UPDATE dining_tables SET is_reserved = 1", [])
            .unwrap();

        let window = ReservationWindow::new(at(19, 0), at(21, 0)).unwrap();
        let restaurant = RestaurantId::new("r-1").unwrap();
        assert!(
            TableAllocator::find_available_table(db.connection(), &restaurant, 2, &window)
                .unwrap()
                .is_some()
        );
    }
}
