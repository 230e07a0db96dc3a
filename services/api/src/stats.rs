use crate::cli::StatsArgs;
use serde_json::json;
use subsidiematch::error::AppError;
use subsidiematch::subsidies::SubsidyStore;

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let store = SubsidyStore::load(&args.data_dir);
    let stats = store.stats();
    let report = store.load_report();

    println!("Subsidy corpus: {}", args.data_dir.display());
    println!(
        "Entries: {} total ({} EIA, {} ISDE, {} MIA/Vamil)",
        stats.total_entries, stats.eia_codes, stats.isde_total, stats.mia_vamil_codes
    );

    println!("\nPer family");
    for status in &report.families {
        let note = match &status.error {
            Some(message) => format!(" ({message})"),
            None if !status.loaded => " (file absent)".to_string(),
            None => String::new(),
        };
        println!(
            "- {}: {} records{}",
            status.family.label(),
            status.records,
            note
        );
    }

    let warnings = store.integrity_warnings();
    if warnings.is_empty() {
        println!("\nIntegrity warnings: none");
    } else {
        println!("\nIntegrity warnings");
        for warning in warnings {
            println!("- {}: duplicate id {}", warning.scheme.label(), warning.id);
        }
    }

    let payload = json!({ "stats": stats, "families": report.families });
    match serde_json::to_string_pretty(&payload) {
        Ok(rendered) => println!("\nMachine-readable summary:\n{rendered}"),
        Err(err) => println!("\nMachine-readable summary unavailable: {err}"),
    }

    Ok(())
}
