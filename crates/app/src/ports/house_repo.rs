//! House repository port: persistence for the spatial hierarchy.

use std::future::Future;

use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::house::House;

/// Loads and stores the house structure (floors, rooms, devices).
pub trait HouseRepository {
    /// Rebuild the house from storage, or `None` if none was ever saved.
    fn load(&self) -> impl Future<Output = Result<Option<House>, SmartHouseError>> + Send;

    /// Persist a complete house graph.
    fn save(&self, house: &House) -> impl Future<Output = Result<(), SmartHouseError>> + Send;
}
