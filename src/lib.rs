pub mod cli;
pub mod config;
pub mod error;
pub mod formats;
pub mod granularity;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod preview;
