pub mod appointments;
pub mod manager;
pub mod models;

pub use appointments::{AppointmentStore, StoreError};
