//! Core data structures for multivariate time series.

mod mtserie;

pub use mtserie::{DateSpec, DatesRange, MTSerie, MTSerieBuilder, TimeLength};
