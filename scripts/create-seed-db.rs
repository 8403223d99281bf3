// Script to create the seed SQLite database shipped next to the binary
// Run with: cargo run --bin create-seed-db

use std::path::PathBuf;

use swiftdash_lib::db::DashboardStore;

fn main() -> anyhow::Result<()> {
    let db_path = PathBuf::from("resources").join(swiftdash_lib::db::store::DB_FILE_NAME);

    // Remove existing if present
    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }

    let store = DashboardStore::open_at(&db_path)?;
    store.get_or_create_settings()?;
    let added = store.ensure_default_categories()?;

    println!("Created seed database at: {}", db_path.display());
    println!("   Default categories: {}", added);
    println!("   Version: {}", store.get_last_version_seen()?);

    Ok(())
}
