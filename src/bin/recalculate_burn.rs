//! Simple utility to recalculate a day's exercise burn
//! Usage: cargo run --bin recalculate_burn -- <profile_id> [date]

use std::path::PathBuf;

fn get_database_path() -> PathBuf {
    std::env::var("MACROTRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("macrotrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let profile_id: i64 = args
        .get(1)
        .ok_or("Usage: recalculate_burn <profile_id> [date]")?
        .parse()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let date = args.get(2).map(|s| s.as_str()).unwrap_or(&today);

    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = macrotrack::db::Database::new(&db_path)?;

    let fresh = macrotrack::tools::workouts::current_burn(&database, profile_id, date)?;
    println!("Burn from stored sets: {} kcal", fresh);

    let result = macrotrack::tools::workouts::recalculate_burn(&database, profile_id, date)?;
    println!("Date: {}", result.date);
    println!("  Old burn: {} kcal", result.previous_burn);
    println!("  New burn: {} kcal", result.exercise_burn);
    println!(
        "  Difference: {} kcal (adjustment now {})",
        result.exercise_burn - result.previous_burn,
        result.adjustment
    );

    Ok(())
}
