pub mod google;
pub mod provider;

pub use google::GooglePlacesProvider;
pub use provider::{PlacesProvider, PlacesQuery};
