pub mod stats_api;

pub use stats_api::{CrimeStatsApi, Endpoint};
