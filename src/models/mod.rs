pub mod hotel;

pub use hotel::{Hotel, HotelPage, HotelPayload, Room};
