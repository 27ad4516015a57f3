//! Financial sentiment for web pages.
//!
//! Extracts the main text of a page, sends it to a local sentiment server and
//! presents the label, confidence, summary and investment advice it returns,
//! with an optional accurate/inaccurate feedback round-trip.

pub mod config;
pub mod controller;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod page;
pub mod relay;
