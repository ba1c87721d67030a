pub mod blackcard;
pub mod businesses;
pub mod campaigns;
pub mod connection;
pub mod intent;
pub mod schema;
pub mod scans;
pub mod settings;
pub mod users;

pub use businesses::BusinessStats;
pub use connection::Database;
