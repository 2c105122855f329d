// Terminal front end for the complaint dashboard.
//
// - Option [1] loads a complaint CSV and derives the working table.
// - Options [2]-[5] render the summary, zone, department and officer views.
// - Option [6] writes the CSV exports and the JSON summary.
use complaints_dashboard::config::DashboardConfig;
use complaints_dashboard::reports::{self, OfficerRanking};
use complaints_dashboard::types::{Department, MainCategory, SummaryRow};
use complaints_dashboard::util::{format_int, format_pct, read_answer};
use complaints_dashboard::{loader, output, OfficerQuery, Session, SummaryQuery};
use once_cell::sync::Lazy;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, warn};

// The loaded upload survives across menu choices so every view reuses the
// same derived table and report cache.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        config: DashboardConfig::default(),
        session: None,
    })
});

struct AppState {
    config: DashboardConfig,
    session: Option<Session>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `None` once stdin is closed.
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    read_answer(&mut io::stdin().lock())
}

/// Print a numbered option list and return the chosen index.
fn select<T: Display>(label: &str, options: &[T]) -> Option<usize> {
    if options.is_empty() {
        println!("No {} available.\n", label.to_lowercase());
        return None;
    }
    println!("Select {}:", label);
    for (idx, opt) in options.iter().enumerate() {
        println!("[{}] {}", idx + 1, opt);
    }
    loop {
        match prompt("Enter choice: ")?.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(n - 1),
            _ => println!("Invalid choice. Please enter 1-{}.", options.len()),
        }
    }
}

fn print_metrics(row: &SummaryRow) {
    println!(
        "Open: {} | Resolved: {} | Total: {} | Closure: {}\n",
        format_int(row.open),
        format_int(row.resolved),
        format_int(row.grand_total),
        format_pct(row.closure_pct)
    );
}

fn print_ranking(ranking: &OfficerRanking, max_rows: usize) {
    println!("{}\n", output::render_officers(&ranking.rows, max_rows));
    println!(
        "Total Open: {} | Total Resolved: {} | Active Officers: {} | Closure: {}\n",
        format_int(ranking.total_open()),
        format_int(ranking.total_resolved()),
        format_int(ranking.active_officers()),
        format_pct(ranking.closure_pct())
    );
}

/// Handle option [1]: load the complaint file and start a fresh session.
fn handle_load() {
    let mut state = state();
    let default = state.config.default_input.display().to_string();
    let Some(input) = prompt(&format!("Enter CSV filename [{}]: ", default)) else {
        return;
    };
    let path = if input.is_empty() { default } else { input };

    match loader::load_complaints(&path) {
        Ok((records, report)) => {
            println!("Loaded {} records", format_int(report.total_rows));
            if report.unassigned > 0 {
                println!("Info: {} records have no assignee.", format_int(report.unassigned));
            }
            if report.missing_zone > 0 {
                println!("Info: {} records have no zone.", format_int(report.missing_zone));
            }
            if report.extra_columns > 0 {
                println!(
                    "Info: {} additional columns carried through.",
                    format_int(report.extra_columns)
                );
            }
            println!();
            state.session = Some(Session::new(&records));
        }
        Err(e) => {
            error!(%path, "load failed: {}", e);
            eprintln!("Error processing file: {}\n", e);
            state.session = None;
        }
    }
}

/// Option [2]: main category summary followed by each category's
/// subcategory breakdown.
fn handle_summary(session: &mut Session, config: &DashboardConfig) {
    let Some(summary) = session.summary(SummaryQuery::MainCategories) else {
        println!("No data.\n");
        return;
    };
    println!("Status-wise Summary by Main Category\n");
    println!("{}\n", output::render_summary(summary, config.preview_rows));
    print_metrics(&summary.total);

    let tabs = reports::category_counts(session.table());
    for (category, count) in tabs {
        println!("{} ({}) - Subcategory Breakdown\n", category, format_int(count));
        if let Some(sub) = session.summary(SummaryQuery::Subcategories(category)) {
            println!("{}\n", output::render_summary(sub, config.preview_rows));
            print_metrics(&sub.total);
        }
    }
}

/// Option [3]: one category within one zone.
fn handle_zone(session: &mut Session, config: &DashboardConfig) {
    let categories = reports::main_categories(session.table());
    let zones = reports::zones(session.table());
    let Some(c) = select("Main Category", &categories) else { return };
    let Some(z) = select("Zone", &zones) else { return };
    let (category, zone) = (categories[c], zones[z].clone());

    match session.summary(SummaryQuery::ZoneSubcategories(category, zone.clone())) {
        Some(table) => {
            println!("{} - Zone {} - Subcategory Breakdown\n", category, zone);
            println!("{}\n", output::render_summary(table, config.preview_rows));
            print_metrics(&table.total);
        }
        None => println!("No data found for {} in Zone {}\n", category, zone),
    }
}

/// Option [4]: main category breakdown for one department.
fn handle_department(session: &mut Session, config: &DashboardConfig) {
    let departments = reports::departments(session.table());
    let Some(d) = select("Department", &departments) else { return };
    let department: Department = departments[d];

    match session.summary(SummaryQuery::Department(department)) {
        Some(table) => {
            println!("{} - Main Category Breakdown\n", department);
            println!("{}\n", output::render_summary(table, config.preview_rows));
            print_metrics(&table.total);
        }
        None => println!("No data found for {}\n", department),
    }
}

/// Option [5]: LMC officers ranked by open tickets.
fn handle_officers(session: &mut Session, config: &DashboardConfig) {
    let views = ["By Zone", "By Main Category", "By Zone + Category"];
    let Some(view) = select("View", &views) else { return };

    let zones = reports::lmc_zones(session.table());
    let categories = reports::main_categories(session.table());
    let mut query = OfficerQuery {
        category: None,
        zone: None,
    };
    if view != 1 {
        let Some(z) = select("Zone", &zones) else { return };
        query.zone = Some(zones[z].clone());
    }
    if view != 0 {
        let Some(c) = select("Main Category", &categories) else { return };
        query.category = Some(categories[c]);
    }

    let scope = describe_scope(query.category, query.zone.as_deref());
    match session.officers(query) {
        Some(ranking) => {
            println!("LMC Officer Performance - {}\n", scope);
            print_ranking(ranking, config.preview_rows);
        }
        None => println!("No LMC complaints found for {}\n", scope),
    }
}

fn describe_scope(category: Option<MainCategory>, zone: Option<&str>) -> String {
    match (category, zone) {
        (Some(c), Some(z)) => format!("Zone {} | Category {}", z, c),
        (Some(c), None) => format!("Category {}", c),
        (None, Some(z)) => format!("Zone {}", z),
        (None, None) => "all records".to_string(),
    }
}

/// Option [6]: write both CSV exports and the JSON summary.
fn handle_export(session: &mut Session, config: &DashboardConfig) {
    let subcategories = session.all_subcategories();
    let Some(summary) = session.summary(SummaryQuery::MainCategories).cloned() else {
        warn!("export requested with no summary data");
        println!("No data to export.\n");
        return;
    };

    let stats = reports::generate_summary(session.table(), Some(&summary));
    let outcome = output::export_reports(config, &summary, &subcategories, &stats);
    if outcome.is_complete() {
        let written: Vec<String> =
            outcome.written.iter().map(|p| p.display().to_string()).collect();
        println!("Reports exported to {}\n", written.join(", "));
        return;
    }
    for (path, e) in &outcome.failed {
        eprintln!("Write error: {}: {}", path.display(), e);
    }
    let failed: Vec<String> =
        outcome.failed.iter().map(|(p, _)| p.display().to_string()).collect();
    println!("Export incomplete. Not written: {}\n", failed.join(", "));
}

fn with_session(f: fn(&mut Session, &DashboardConfig)) {
    let mut state = state();
    let AppState { config, session } = &mut *state;
    match session {
        Some(session) => f(session, config),
        None => println!("Error: No data loaded. Please load the CSV file first (option 1).\n"),
    }
}

fn main() {
    let level = state().config.log_level;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    loop {
        println!("Complaints Status Summary Dashboard");
        println!("[1] Load the file");
        println!("[2] Main Category Summary");
        println!("[3] Zone-wise Drill-Down");
        println!("[4] Department-wise Drill-Down");
        println!("[5] LMC Officer Performance");
        println!("[6] Export Reports");
        println!("[0] Exit\n");
        let Some(choice) = prompt("Enter choice: ") else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(),
            "2" => with_session(handle_summary),
            "3" => with_session(handle_zone),
            "4" => with_session(handle_department),
            "5" => with_session(handle_officers),
            "6" => with_session(handle_export),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-6.\n"),
        }
    }
}
