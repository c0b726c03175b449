//! Looks up worlds through a cached repository and prints the cache counters
//!
//! ```text
//! RUST_LOG=gw2net=debug cargo run -p gw2net-api --example cached_lookup
//! ```

use gw2net_api::model::Worlds;
use gw2net_api::{CancellationToken, ClientConfig, Gw2Client, Locale};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Gw2Client::new(ClientConfig::from_env()?.with_locale(Locale::English))?;
    let worlds = client.cached::<Worlds>()?;
    let cancel = CancellationToken::new();

    let all = worlds.find_all_async(&cancel).await?;
    println!("{} worlds", all.len());

    // Served from the cache warmed above.
    let picked = worlds
        .find_all_by_ids_async(&[1001, 1008, 2204], &cancel)
        .await?;
    for (id, world) in &picked {
        println!("{id:>5}  {:<30} {}", world.name, world.population);
    }

    let stats = worlds.stats();
    println!(
        "cache: {} entries, {} hits, {} misses",
        stats.entry_count, stats.hit_count, stats.miss_count
    );
    Ok(())
}
