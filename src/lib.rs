//! Campaign lifecycle management with a read-through query cache.
//!
//! Brands create and evolve campaigns through [`application::campaigns::CampaignService`];
//! listings and creator recommendations are served through [`cache::QueryCache`]
//! and invalidated by prefix whenever a campaign changes.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
