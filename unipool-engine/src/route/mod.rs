//! Multi-stop route ordering and itinerary assembly.
//!
//! [`optimize`] orders waypoints with a greedy nearest-neighbor walk and
//! never touches the network. [`build_itinerary`] resolves the ordered
//! waypoints into driven legs through the gateway; a single failed leg fails
//! the whole build.

use crate::gateway::GatewayError;

mod itinerary;
mod optimize;

pub use itinerary::{Itinerary, RouteLeg, build_itinerary};
pub use optimize::optimize;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// A route needs at least an origin and a destination.
    #[error("route needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    /// Directions lookup failed for one leg of the itinerary.
    #[error("directions lookup failed for leg {leg}: {source}")]
    Leg { leg: usize, source: GatewayError },
}
