//! Network layer - reqwest clients for the two external services and the
//! actor that runs them on the Tokio runtime

pub mod actor;
pub mod backend;
pub mod tmdb;

pub use actor::NetworkActor;
pub use backend::BackendClient;
pub use tmdb::TmdbClient;
