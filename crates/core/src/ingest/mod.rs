pub mod alpha_vantage;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod types;
