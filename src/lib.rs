pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod geocode;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod types;
