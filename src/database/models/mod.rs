pub mod appointment;

pub use appointment::{Appointment, NewAppointment};
