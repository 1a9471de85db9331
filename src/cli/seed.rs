use std::sync::Arc;

use crate::app_data::AppData;
use crate::services::SeedService;

/// Seed the database and print per-set counts
pub async fn run_seed(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let response = SeedService::new(app_data).seed().await?;

    for set in &response.sets {
        println!("{:<22} created {:>3}  existing {:>3}", set.name, set.created, set.existing);
    }
    println!("✓ Seed complete, {} row(s) created", response.total_created);
    Ok(())
}
