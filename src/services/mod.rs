pub mod listing;
pub mod mutation;

pub use listing::list_hotels;
pub use mutation::{create_hotel, update_hotel};
