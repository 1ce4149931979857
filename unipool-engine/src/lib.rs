//! Campus carpool matching and routing engine.
//!
//! Scores and ranks candidate rides for a rider request, suggests pickup
//! spots along candidate routes, orders multi-stop trips, and recommends
//! rides from booking history. Geocoding and routing go through a cached,
//! rate-limited Mapbox gateway with a local Lahore gazetteer as fallback.

pub mod domain;
pub mod gateway;
pub mod gazetteer;
pub mod geo;
pub mod mapbox;
pub mod matching;
pub mod recommend;
pub mod route;
pub mod store;
