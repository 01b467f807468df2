//! Company registry clients

pub mod dadata;

pub use dadata::DadataClient;
