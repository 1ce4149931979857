//! Domain types for the carpool matching engine.
//!
//! This module contains the core model types shared across the engine.
//! Coordinate values enforce their invariants at construction time, so code
//! that receives a `Point` can trust its validity.

mod ids;
mod location;
mod point;
mod ride;
mod user;

pub use ids::{RideId, UserId};
pub use location::{Location, Place};
pub use point::{InvalidPoint, Point};
pub use ride::{Booking, BookingRecord, CandidateRide, RiderRequest};
pub use user::User;
