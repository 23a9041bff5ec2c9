//! Fetch the first few deals.
//!
//! This example validates a HubSpot private-app token and prints the ID
//! and name of the first ten deals.
//!
//! Run with: HUBSPOT_ACCESS_TOKEN=pat-... cargo run --example fetch_deals

use futures_util::StreamExt;
use hubspot_deals::{ClientConfig, HubSpotClient};

#[tokio::main]
async fn main() -> hubspot_deals::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let token = std::env::var("HUBSPOT_ACCESS_TOKEN").unwrap_or_default();
    let base_url = std::env::var("HUBSPOT_BASE_URL")
        .unwrap_or_else(|_| hubspot_deals::DEFAULT_BASE_URL.to_string());

    let client = HubSpotClient::with_config(token, ClientConfig::default().with_base_url(base_url))?;

    println!("Testing HubSpot Deals API...\n");

    if !client.validate_credentials().await? {
        println!("Credential check failed with an unexpected status");
        return Ok(());
    }

    let mut deals = client
        .iterate_all_deals(vec!["dealname".to_string()], 10)
        .take(10);

    while let Some(deal) = deals.next().await {
        let deal = deal?;
        println!("{} {}", deal.id, deal.name().unwrap_or("-"));
    }

    println!("\nSUCCESS: HubSpot connection working.");
    Ok(())
}
