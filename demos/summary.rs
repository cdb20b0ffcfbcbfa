use std::env;
use std::process::ExitCode;

use ottdkit::Result;
use tracing_subscriber::EnvFilter;

fn run(path: &str) -> Result<()> {
    let state = ottdkit::load(path)?;

    println!("version: {}", state.version);
    println!("map: {}x{}", state.map.width(), state.map.height());
    match state.current_date {
        Some(date) => println!("years: {}-{}", state.start_year, date.year),
        None => println!("start year: {}", state.start_year),
    }
    for (slot, company) in state.active_companies() {
        println!(
            "company {}: {}{}",
            slot + 1,
            company.name.as_deref().unwrap_or_default(),
            if company.ai { " (AI)" } else { "" }
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: summary <savegame>");
        return ExitCode::FAILURE;
    };
    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{path}: {e}");
            ExitCode::FAILURE
        }
    }
}
