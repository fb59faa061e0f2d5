//! Utility to seed the exercise catalog in the database
//! Usage: cargo run --bin seed_catalog -- [catalog.json]
//!
//! Without an argument the bundled default catalog is loaded.

use std::path::PathBuf;

fn get_database_path() -> PathBuf {
    std::env::var("MACROTRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("macrotrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = macrotrack::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        macrotrack::db::migrations::run_migrations(conn)?;

        let seeded = match args.get(1) {
            Some(path) => {
                println!("Loading catalog from {}", path);
                let json = std::fs::read_to_string(path)
                    .map_err(|e| macrotrack::db::DbError::Catalog(e.to_string()))?;
                macrotrack::models::Exercise::seed_from_json(conn, &json)?
            }
            None => {
                println!("Loading bundled default catalog");
                macrotrack::models::Exercise::seed_from_json(
                    conn,
                    macrotrack::models::DEFAULT_CATALOG_JSON,
                )?
            }
        };

        let total = macrotrack::models::Exercise::count(conn)?;
        println!("Seeded {} exercises ({} total in catalog)", seeded, total);
        Ok(())
    })?;

    Ok(())
}
