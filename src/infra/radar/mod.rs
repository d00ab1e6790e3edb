//! Client for the crime statistics ("radar") web service.

mod client;

pub use client::RadarClient;
