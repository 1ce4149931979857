//! Collaborator interfaces for ride and user data.
//!
//! The engine never talks to a database directly: candidate rides, booking
//! counts, and user records arrive through these traits. Tests implement
//! them with in-memory fixtures.

use chrono::{DateTime, Utc};

use crate::domain::{Booking, BookingRecord, CandidateRide, RideId, User, UserId};

/// Filter for [`RideStore::find_available`].
#[derive(Debug, Clone)]
pub struct RideQuery {
    /// Destination text to filter on.
    pub destination: String,

    /// Desired departure time; the store returns rides departing around it.
    pub departure: DateTime<Utc>,

    /// Minimum free seats.
    pub seats: u32,
}

/// Errors from the ride and user stores.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No user with the given id
    #[error("user {id} not found")]
    UserNotFound { id: UserId },

    /// The backing store failed
    #[error("store backend error: {message}")]
    Backend { message: String },
}

/// Source of candidate rides and booking data.
///
/// This abstraction allows the engine to be tested with mock data.
#[allow(async_fn_in_trait)]
pub trait RideStore {
    /// Rides matching the destination, departure window, and seat filter.
    async fn find_available(&self, query: &RideQuery) -> Result<Vec<CandidateRide>, StoreError>;

    /// Confirmed bookings on a ride. The number of bookings is the live
    /// booked-seat count.
    async fn bookings_for_ride(&self, ride: RideId) -> Result<Vec<Booking>, StoreError>;

    /// Pattern-search variant: rides matching a pickup/destination pair.
    async fn find_by_route(
        &self,
        pickup: &str,
        destination: &str,
        seats: u32,
    ) -> Result<Vec<CandidateRide>, StoreError>;

    /// A rider's booking history.
    async fn booking_history(&self, user: UserId) -> Result<Vec<BookingRecord>, StoreError>;
}

/// Source of user records.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    /// Look up a user by id. `None` means no such user.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}
