//! GeoPlot Core - Shape models, limits, and configuration
//!
//! This crate contains the domain types shared by the overlap engine, the
//! feature store and the command-line front end.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;

pub use error::{GeoplotError, Rejection, Result};
