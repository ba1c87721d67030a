pub mod activity;
pub mod business;
pub mod campaign;
pub mod intent;
pub mod scan;
pub mod user;

pub use activity::*;
pub use business::*;
pub use campaign::*;
pub use intent::*;
pub use scan::*;
pub use user::*;
