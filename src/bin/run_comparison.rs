// src/bin/run_comparison.rs
//
// Usage: run_comparison <amount> <start_year> <assets, e.g. equity,gold> [--real]
use asset_compare::config::AppConfig;
use asset_compare::models::{AssetKind, UserInput};
use asset_compare::services::{compare_investments, HistoryStore};
use asset_compare::BoxError;
use log::info;
use dotenv::dotenv;
use std::env;

fn parse_assets(arg: &str) -> Result<Vec<AssetKind>, BoxError> {
    arg.split(',')
        .map(|tag| {
            serde_json::from_value(serde_json::Value::String(tag.trim().to_lowercase()))
                .map_err(|_| format!("Unknown asset {:?}", tag).into())
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        return Err("usage: run_comparison <amount> <start_year> <assets> [--real]".into());
    }

    let input = UserInput {
        name: env::var("NAME").ok(),
        investment_amount: args[0].parse()?,
        start_year: args[1].parse()?,
        selected_assets: parse_assets(&args[2])?,
        adjust_for_inflation: args.iter().any(|a| a == "--real"),
    };

    let store = HistoryStore::load(AppConfig::from_env()?)?;
    info!("Running comparison for {:?}", input);

    let result = compare_investments(input, &store).await?;

    println!(
        "{} to {} ({} years)",
        result.metadata.start_date, result.metadata.end_date, result.metadata.years_invested
    );
    for perf in &result.performance {
        println!(
            "{:<7} {:>14.2} -> {:>14.2}  return {:>9.2}%  cagr {:>6.2}%  vol {:>6.2}%  max dd {:>6.2}%",
            perf.asset.to_string(),
            perf.start_value,
            perf.end_value,
            perf.total_return,
            perf.cagr,
            perf.volatility,
            perf.max_drawdown
        );
    }
    if let Some(name) = &result.user_input.name {
        for perf in &result.performance {
            println!(
                "{}, if you had invested ${:.0} into {} {} years ago, you would have ${:.0} today ({:+.1}%).",
                name,
                perf.start_value,
                perf.asset.label(),
                result.metadata.years_invested,
                perf.end_value,
                perf.total_return
            );
        }
    }
    for projection in &result.projections {
        println!(
            "{:<7} in 5 years: {:>14.2} / {:>14.2} / {:>14.2}",
            projection.asset.to_string(),
            projection.five_year.conservative,
            projection.five_year.average,
            projection.five_year.optimistic
        );
    }

    if env::var("PRINT_JSON").is_ok() {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
