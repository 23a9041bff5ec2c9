//! API service modules for HubSpot CRM endpoints.

mod deals;

pub use deals::{DealsQuery, DealsService, DEALS_PATH};
