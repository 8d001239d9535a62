//! tunedeck - browse a music library through its live views
//!
//! Loads a JSON library file into the in-memory stores and prints what the
//! songs, artists, albums and playlists screens would show.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use tunedeck::config::{Paths, Settings};
use tunedeck::engine::LiveValue;
use tunedeck::library::{StalenessSweeper, ARTIST_ID_ARG};
use tunedeck::models::{Album, Artist, Playlist, Song};
use tunedeck::plugins::HttpMetadataClient;
use tunedeck::stores::{
    JsonPreferenceStore, LibrarySnapshot, MemoryDatabase, MemoryDownloads, PreferenceStore,
};
use tunedeck::{
    ArtistSongs, LibraryAlbums, LibraryArtists, LibraryContext, LibraryPlaylists, LibrarySongs,
};

/// How long `list` waits for the first query result
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// tunedeck - reactive music library views
#[derive(Parser, Debug)]
#[command(name = "tunedeck")]
#[command(version)]
#[command(about = "Browse a music library through its live, preference-driven views")]
struct Args {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Library JSON file (defaults to library.json in the config directory)
    #[arg(long)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a screen's list as it settles under the stored preferences
    List {
        #[arg(value_enum)]
        kind: ListKind,

        /// Artist id, required for `artist-songs`
        #[arg(long)]
        artist: Option<String>,
    },

    /// Store a preference value
    Set { key: String, value: String },

    /// Refresh stale artist metadata once and save the library
    Sweep,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListKind {
    Songs,
    Artists,
    Albums,
    Playlists,
    ArtistSongs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter =
        tracing_subscriber::EnvFilter::new(format!("{},hyper=warn,reqwest=warn", log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let paths = Paths::new(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    let settings = Settings::load(Some(paths.settings_path().as_path()))?;
    let library_path = args.library.unwrap_or_else(|| paths.library_path());
    let library = LibrarySnapshot::load(&library_path)?;
    info!(
        "Loaded {} songs, {} artists, {} albums, {} playlists from {:?}",
        library.songs.len(),
        library.artists.len(),
        library.albums.len(),
        library.playlists.len(),
        library_path
    );

    let preferences = Arc::new(JsonPreferenceStore::open(paths.preferences_path()));
    let downloads = Arc::new(MemoryDownloads::new(library.downloads.clone()));
    let database = Arc::new(MemoryDatabase::new(library));

    let mut ctx = LibraryContext::new(
        preferences.clone(),
        database.clone(),
        downloads,
        settings.clone(),
    );
    if let Some(client) = HttpMetadataClient::from_settings(&settings)? {
        ctx = ctx.with_metadata(Arc::new(client));
    }

    match args.command {
        Command::List { kind, artist } => list(&ctx, kind, artist).await,
        Command::Set { key, value } => {
            preferences.set(&key, &value)?;
            info!("Set {} = {}", key, value);
            Ok(())
        }
        Command::Sweep => {
            let Some(client) = ctx.metadata.clone() else {
                anyhow::bail!("metadata_base_url is not configured");
            };
            let artists = database.snapshot().artists;
            let sweeper = StalenessSweeper::new(database.clone(), client, settings.artist_max_age());
            let report = sweeper.sweep(&artists).await;

            for id in &report.refreshed {
                println!("refreshed {}", id);
            }
            for id in &report.failed {
                println!("failed {}", id);
            }
            database.snapshot().save(&library_path)
        }
    }
}

async fn list(ctx: &LibraryContext, kind: ListKind, artist: Option<String>) -> Result<()> {
    match kind {
        ListKind::Songs => {
            let vm = LibrarySongs::new(ctx);
            print_songs(&settle(vm.all_songs()).await?);
        }
        ListKind::Artists => {
            let vm = LibraryArtists::new(ctx);
            print_artists(&settle(vm.all_artists()).await?);
        }
        ListKind::Albums => {
            let vm = LibraryAlbums::new(ctx);
            print_albums(&settle(vm.all_albums()).await?);
        }
        ListKind::Playlists => {
            let vm = LibraryPlaylists::new(ctx);
            print_playlists(&settle(vm.all_playlists()).await?);
        }
        ListKind::ArtistSongs => {
            let route: HashMap<String, String> = artist
                .map(|id| (ARTIST_ID_ARG.to_string(), id))
                .into_iter()
                .collect();
            let vm = ArtistSongs::new(ctx, &route)?;
            match settle(vm.artist()).await? {
                Some(artist) => println!("{} ({})", artist.name, artist.id),
                None => println!("unknown artist {}", vm.artist_id()),
            }
            print_songs(&settle(vm.songs()).await?);
        }
    }
    Ok(())
}

async fn settle<V>(live: &LiveValue<V>) -> Result<V>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::time::timeout(SETTLE_TIMEOUT, live.settled())
        .await
        .context("Timed out waiting for the library query")
}

fn print_songs(songs: &[Song]) {
    for song in songs {
        println!("{}\t{}\t{}", song.id, song.title, song.artist());
    }
}

fn print_artists(artists: &[Artist]) {
    for artist in artists {
        let thumbnail = artist.thumbnail_url.as_deref().unwrap_or("-");
        println!("{}\t{}\t{}", artist.id, artist.name, thumbnail);
    }
}

fn print_albums(albums: &[Album]) {
    for album in albums {
        let year = album.year.map(|y| y.to_string()).unwrap_or_default();
        println!("{}\t{}\t{}", album.id, album.title, year);
    }
}

fn print_playlists(playlists: &[Playlist]) {
    for playlist in playlists {
        println!("{}\t{}\t{} songs", playlist.id, playlist.name, playlist.song_count);
    }
}
