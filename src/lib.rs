//! Energy-usage dataset parsing, aggregation and dashboard views.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod process;
pub mod schema;
pub mod store;
pub mod views;

pub use error::DatasetError;
pub use grid::Grid;
