//! Space travel itinerary server.
//!
//! Answers "which combinations of flights take me from here to there?"
//! against the currently published price list, caching every answer
//! against the list it was computed from.

pub mod cache;
pub mod config;
pub mod domain;
pub mod feed;
pub mod graph;
pub mod planner;
pub mod service;
pub mod store;
pub mod web;
