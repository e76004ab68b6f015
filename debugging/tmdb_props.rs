//! Fetch from TMDB and print the assembled view models as JSON.
//! Usage:
//!   cargo run --bin tmdb_props -- movie <tmdb_id>
//!   cargo run --bin tmdb_props -- tv <tmdb_id>
//!   cargo run --bin tmdb_props -- season <tmdb_id> <season_number>
//!   cargo run --bin tmdb_props -- search <query...>
//! Requires TMDB_API_KEY or TMDB_ACCESS_TOKEN in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use displayr::config::Config;
use displayr::detail::DetailAssembler;
use displayr::gateway::Gateway;
use displayr::search::{run_search, SearchOptions, SearchOutcome};
use displayr::tmdb::{TmdbApi, TmdbClient};
use displayr::views::{cards, ImageBase};
use dotenvy::dotenv;
use serde::Serialize;
use std::env;
use std::sync::Arc;

fn usage() -> anyhow::Error {
    anyhow!("usage: tmdb_props <movie|tv> <id> | season <id> <number> | search <query>")
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = args.split_first().ok_or_else(usage)?;

    let config = Config::from_env()?;
    let api: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let images = ImageBase::new(config.image_base_url.clone());
    let details = DetailAssembler::new(Gateway::new(api.clone()), images.clone());

    let id = || -> Result<i64> {
        rest.first()
            .ok_or_else(usage)?
            .parse()
            .context("id must be a number")
    };

    match command.as_str() {
        "movie" => {
            let id = id()?;
            let view = details
                .movie(id)
                .await
                .ok_or_else(|| anyhow!("movie {id} not found"))?;
            print(&view)
        }
        "tv" => {
            let id = id()?;
            let view = details
                .tv(id)
                .await
                .ok_or_else(|| anyhow!("tv show {id} not found"))?;
            print(&view)
        }
        "season" => {
            let id = id()?;
            let number: u32 = rest
                .get(1)
                .ok_or_else(usage)?
                .parse()
                .context("season number must be a number")?;
            let page = details
                .season(id, number)
                .await
                .ok_or_else(|| anyhow!("season {number} of show {id} not found"))?;
            print(&page)
        }
        "search" => {
            let query = rest.join(" ");
            match run_search(api.as_ref(), &query, &SearchOptions::default()).await {
                SearchOutcome::Results(items) => print(&cards(&items, &images)),
                SearchOutcome::Empty => {
                    println!("no results for '{query}'");
                    Ok(())
                }
                SearchOutcome::Error(message) => Err(anyhow!(message)),
            }
        }
        _ => Err(usage()),
    }
}
