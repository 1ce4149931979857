use super::ids::UserId;

/// A user record as served by the user store. Doubles as the driver
/// summary attached to enriched matches.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Average driver rating on a 0 to 5 scale.
    pub rating: f64,
    pub total_rides: u32,
    pub profile: Option<String>,
}
