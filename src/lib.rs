//! Scraper for the latest weather observations published by the Bureau of Meteorology
//! for a small set of Australian stations.

pub mod config;
pub mod errors;
pub mod initialization;
pub mod logging;
pub mod manager_bom;
pub mod self_test;
