use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::warn;
use serde_json::{json, Value};
use std::path::PathBuf;

use forkcast::config::{State, MAX_TOP_N};
use forkcast::logger::StderrLogger;
use forkcast::ranker::top_n_by_rating;
use forkcast::stats;
use forkcast::{FilterParams, RecommendError, Session};

#[derive(Parser)]
#[command(name = "forkcast")]
#[command(version = "0.1")]
#[command(about = "Restaurant dashboard engine: filters, recommendations and leaderboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct FilterArgs {
    /// Data source, overrides FORKCAST_PATH
    #[arg(long)]
    data: Option<PathBuf>,
    /// Keep only these cities (repeatable)
    #[arg(long = "city")]
    cities: Vec<String>,
    #[arg(long)]
    online_delivery: bool,
    #[arg(long)]
    table_booking: bool,
}

impl FilterArgs {
    fn params(&self) -> FilterParams {
        FilterParams {
            cities: self.cities.iter().cloned().collect(),
            require_online_delivery: self.online_delivery,
            require_table_booking: self.table_booking,
        }
    }

    fn path(&self, state: &State) -> PathBuf {
        self.data.clone().unwrap_or_else(|| PathBuf::from(&state.path))
    }
}

#[derive(Subcommand)]
enum Commands {
    Recommend {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        restaurant: String,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_TOP_N as u64))]
        top: Option<u64>,
    },
    Top {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        count: Option<usize>,
    },
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },
    Map {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        max_rating: Option<f64>,
    },
    Cities {
        #[command(flatten)]
        filters: FilterArgs,
    },
    Restaurants {
        #[command(flatten)]
        filters: FilterArgs,
    },
    Config,
}

fn status(err: &RecommendError) -> Value {
    json!({
        "status": err.status(),
        "message": err.user_message(),
        "results": [],
    })
}

fn empty_state(message: &str) -> Value {
    json!({
        "status": "empty",
        "message": message,
        "results": [],
    })
}

fn recommend_command(
    session: &mut Session,
    state: &State,
    filters: &FilterArgs,
    restaurant: &str,
    top: Option<u64>,
) -> Result<Value> {
    let path = filters.path(state);
    let params = filters.params();
    let top_n = top.map(|t| t as usize).unwrap_or(state.top_n);

    let subset = session
        .subset(&path, &params)
        .with_context(|| format!("Failed to load '{}'", path.display()))?;
    if subset.is_empty() {
        return Ok(empty_state("No restaurants available for the selected filters."));
    }

    match session.recommend(&path, &params, restaurant, top_n) {
        Ok(results) if results.is_empty() => {
            Ok(empty_state("No similar restaurants found for this selection."))
        }
        Ok(results) => Ok(json!({
            "status": "ok",
            "anchor": restaurant,
            "subset_size": subset.len(),
            "requested_results_count": top_n,
            "actual_results_count": results.len(),
            "results": results,
        })),
        Err(err) if err.is_recoverable() => {
            warn!("{}", err);
            Ok(status(&err))
        }
        Err(err) => Err(err.into()),
    }
}

fn top_command(
    session: &mut Session,
    state: &State,
    filters: &FilterArgs,
    count: Option<usize>,
) -> Result<Value> {
    let path = filters.path(state);
    let n = count.unwrap_or(state.leaderboard_size);
    let leaderboard = session.leaderboard(&path, &filters.params(), n)?;
    if leaderboard.is_empty() {
        return Ok(empty_state("No restaurants available to display leaderboard."));
    }
    let entries: Vec<Value> = leaderboard
        .iter()
        .enumerate()
        .map(|(rank, r)| {
            json!({
                "rank": rank + 1,
                "stars": r.stars(),
                "restaurant": r,
            })
        })
        .collect();
    Ok(json!({ "status": "ok", "results": entries }))
}

fn stats_command(session: &mut Session, state: &State, filters: &FilterArgs) -> Result<Value> {
    let subset = session.subset(&filters.path(state), &filters.params())?;
    if subset.is_empty() {
        return Ok(empty_state("No restaurants match the selected filters."));
    }
    Ok(json!({
        "status": "ok",
        "summary": stats::summarize(&subset),
        "top_cuisines": stats::top_cuisines(&subset, state.top_cuisines),
        "rating_distribution": stats::rating_distribution(&subset, state.highlight_size),
        "price_vs_rating": stats::price_vs_rating(&subset),
        "cuisine_text": stats::cuisine_text(&subset),
    }))
}

fn map_command(
    session: &mut Session,
    state: &State,
    filters: &FilterArgs,
    min_rating: Option<f64>,
    max_rating: Option<f64>,
) -> Result<Value> {
    let subset = session.subset(&filters.path(state), &filters.params())?;
    let Some((low, high)) = stats::rating_bounds(&subset) else {
        return Ok(empty_state("No restaurants available to display on the map."));
    };
    let in_range = stats::within_rating_range(
        &subset,
        min_rating.unwrap_or(low),
        max_rating.unwrap_or(high),
    );
    if in_range.is_empty() {
        return Ok(empty_state("No restaurants found in this rating range."));
    }
    let highlight = top_n_by_rating(&subset, state.highlight_size);
    Ok(json!({
        "status": "ok",
        "rating_bounds": [low, high],
        "points": stats::map_points(&in_range),
        "highlight": highlight
            .iter()
            .filter(|r| r.location.is_some())
            .collect::<Vec<_>>(),
    }))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let state = State::new()?;
    StderrLogger::new(state.verbose).install()?;
    let mut session = Session::from_state(&state);

    let output = match &args.command {
        Commands::Recommend {
            filters,
            restaurant,
            top,
        } => recommend_command(&mut session, &state, filters, restaurant, *top)?,
        Commands::Top { filters, count } => top_command(&mut session, &state, filters, *count)?,
        Commands::Stats { filters } => stats_command(&mut session, &state, filters)?,
        Commands::Map {
            filters,
            min_rating,
            max_rating,
        } => map_command(&mut session, &state, filters, *min_rating, *max_rating)?,
        Commands::Cities { filters } => {
            let dataset = session.dataset(&filters.path(&state))?;
            json!({ "status": "ok", "results": stats::cities(&dataset) })
        }
        Commands::Restaurants { filters } => {
            let subset = session.subset(&filters.path(&state), &filters.params())?;
            json!({ "status": "ok", "results": stats::restaurant_names(&subset) })
        }
        Commands::Config => {
            state.print_config();
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
