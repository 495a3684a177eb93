pub mod client;

pub use client::{extract_message, ApiPath, ClinicApiClient};
