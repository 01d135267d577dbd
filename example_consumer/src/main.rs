//! Example consumer: lists payment types from a running backend and prints
//! the first page as table markup.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Point it elsewhere with `COOP_API_URL=https://... cargo run -p example-consumer`.

use coop_data::domain::payment_type;
use coop_data::{DataContext, DataTable, PageQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coop_data=info")),
        )
        .init();

    let ctx = DataContext::from_env()?;
    let payments = payment_type::resource(&ctx)?;
    tracing::info!(api_url = %ctx.config.api_url, "fetching payment types");

    let page = payments.get_paginated(&PageQuery::new(0, 10)).await?;
    tracing::info!(
        rows = page.data.len(),
        total = page.total_size,
        pages = page.total_page,
        "page loaded"
    );

    let table = DataTable::new(payment_type::columns(), |p: &payment_type::PaymentType| p.id.to_string());
    let state = table.initial_state();
    println!("{}", table.render(&page.data, &state).to_html());
    Ok(())
}
