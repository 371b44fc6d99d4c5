use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rockola_config::RockolaPaths;
use rockola_core::domain::{SearchMode, UNKNOWN_ARTIST};
use rockola_core::services::{RequestError, format_duration};
use rockola_lib::{Kiosk, KioskOptions, StatusDto};

#[derive(Parser)]
#[command(name = "rockola")]
#[command(about = "Song-request kiosk", long_about = None)]
struct Cli {
  /// Keep rate limits in memory instead of the SQLite database
  #[arg(long, global = true)]
  ephemeral: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Search the curated catalog and MusicBrainz
  Search {
    /// Words to search for
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Field to match: title or artist
    #[arg(long, default_value = "title")]
    by: SearchMode,
  },
  /// Send a song request to the DJ
  Request {
    /// Free text entry, "Title - Artist"
    #[arg(conflicts_with = "title")]
    entry: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long, requires = "title")]
    artist: Option<String>,
  },
  /// Show the request limit for this kiosk
  Status {
    /// Print as JSON
    #[arg(long)]
    json: bool,
  },
  /// Clear the request limit (staff only)
  Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let paths = RockolaPaths::detect()?;
  tracing::debug!(config = %paths.config_file().display(), "using configuration");
  let kiosk = Kiosk::bootstrap(&paths, KioskOptions { ephemeral: cli.ephemeral })?;

  match cli.command {
    Commands::Search { query, by } => search(&kiosk, &query.join(" "), by).await,
    Commands::Request { entry, title, artist } => request(&kiosk, entry, title, artist).await,
    Commands::Status { json } => status(&kiosk, json),
    Commands::Reset => {
      kiosk.requests.reset_limits();
      println!("Request limit cleared.");
      Ok(())
    }
  }
}

async fn search(kiosk: &Kiosk, query: &str, mode: SearchMode) -> Result<()> {
  let outcome = kiosk.search.search(query, mode).await;

  if let Some(notice) = &outcome.notice {
    println!("{notice}");
  }
  if outcome.candidates.is_empty() && outcome.notice.is_none() {
    println!("No songs found. You can still request it by typing \"Title - Artist\".");
  }

  for (i, candidate) in outcome.candidates.iter().enumerate() {
    let marker = if candidate.is_curated() { "*" } else { " " };
    println!("{:>2}. {marker} {candidate}", i + 1);
  }

  Ok(())
}

async fn request(kiosk: &Kiosk, entry: Option<String>, title: Option<String>, artist: Option<String>) -> Result<()> {
  let result = match (entry, title) {
    (_, Some(title)) => {
      let artist = artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
      kiosk.requests.submit(&title, &artist).await
    }
    (Some(entry), None) => kiosk.requests.submit_manual(&entry).await,
    (None, None) => bail!("give a song as \"Title - Artist\" or use --title/--artist"),
  };

  match result {
    Ok(receipt) => {
      println!("Sent \"{}\" by {} to the DJ.", receipt.request.title, receipt.request.artist);
      if let Some(message) = &receipt.message {
        println!("{message}");
      }
      println!("{}", receipt.fun_fact);

      let status = kiosk.requests.status();
      if status.is_in_cooldown {
        println!("Next request available in {}.", format_duration(status.time_until_next_request));
      }
      Ok(())
    }
    Err(RequestError::Submission(e)) => {
      tracing::error!(error = %e, "request submission failed");
      bail!("Failed to submit request. Please try again.")
    }
    Err(e) => bail!("{e}"),
  }
}

fn status(kiosk: &Kiosk, json: bool) -> Result<()> {
  let dto = StatusDto::from(kiosk.requests.status());

  if json {
    println!("{}", serde_json::to_string_pretty(&dto)?);
    return Ok(());
  }

  if dto.can_request {
    println!("Ready. {} requests this session, {} free before cooldowns.", dto.request_count, dto.remaining_free_requests);
  } else {
    println!("Cooling down: {} left.", dto.wait);
  }
  if !dto.next_cooldown.is_empty() {
    println!("Next request starts a {} cooldown.", dto.next_cooldown);
  }

  Ok(())
}
