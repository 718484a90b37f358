pub mod alerts;
pub mod booking;
pub mod catalog;
pub mod suggest;

pub use alerts::Alerts;
pub use booking::{BookingConfirmation, BookingEngine};
pub use catalog::{Catalog, NewRide, RideFilter, RideListing};
pub use suggest::CitySuggestions;
