//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod actuator_store;
pub mod house_repo;
pub mod measurement_store;

pub use actuator_store::ActuatorStateStore;
pub use house_repo::HouseRepository;
pub use measurement_store::MeasurementStore;
