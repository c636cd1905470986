use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use songvault::collections::TitleOrdering;
use songvault::model::{PlaylistId, Track, TrackId, UserId};
use songvault::persist::WriteMode;
use songvault::{Library, StoreConfig, UserSession};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "songvault")]
#[command(about = "Favorites, playlists and play history over a song catalog", long_about = None)]
struct Args {
    /// Path to the song catalog (songs.csv)
    #[arg(short = 'c', long, default_value = "songs.csv")]
    catalog: String,

    /// Directory holding per-user data files
    #[arg(short = 'd', long, default_value = "~/.local/share/songvault")]
    data_dir: String,

    /// User whose favorites, playlists and history are used
    #[arg(short = 'u', long, default_value = "default")]
    user: String,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Replace data files atomically (write to a temp file, then rename)
    #[arg(long)]
    atomic: bool,

    /// Order the title index ignoring case
    #[arg(long)]
    ignore_case: bool,

    /// Print tracks as JSON instead of comma-separated lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every track in catalog order
    List,

    /// Show a single track
    Song { id: TrackId },

    /// Look up a track by its exact title
    Search { title: String },

    /// Search titles and artists, ignoring case
    Find {
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// List every track sorted by title
    TracksAz,

    /// Record that a track was played
    Play { id: TrackId },

    /// Show recently played tracks, most recent first
    Recent,

    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Manage playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistAction,
    },

    /// Tracks connected to a track through shared artists
    Recommend { id: TrackId },
}

#[derive(Subcommand, Debug)]
enum FavAction {
    Add { id: TrackId },
    Remove { id: TrackId },
    Check { id: TrackId },
    List,
}

#[derive(Subcommand, Debug)]
enum PlaylistAction {
    /// Create an empty playlist
    Create {
        /// Playlist id (defaults to the current Unix time)
        #[arg(long)]
        id: Option<PlaylistId>,

        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    Add { playlist: PlaylistId, song: TrackId },
    Remove { playlist: PlaylistId, song: TrackId },
    List,
    Show { playlist: PlaylistId },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in paths
    let catalog_path = PathBuf::from(shellexpand::tilde(&args.catalog).as_ref());
    let data_dir = PathBuf::from(shellexpand::tilde(&args.data_dir).as_ref());

    let ordering = if args.ignore_case {
        TitleOrdering::IgnoreCase
    } else {
        TitleOrdering::CaseSensitive
    };
    let library = Library::load(&catalog_path, ordering)
        .with_context(|| format!("Failed to load catalog {:?}", catalog_path))?;

    let write_mode = if args.atomic {
        WriteMode::Atomic
    } else {
        WriteMode::Truncate
    };
    let config = StoreConfig::new(data_dir).with_write_mode(write_mode);
    let user = UserId::new(args.user.clone())?;

    let out = Output { json: args.json };
    let open = || {
        UserSession::load(&config, user.clone())
            .with_context(|| format!("Failed to load data for user {}", user))
    };

    match args.command {
        Command::List => out.tracks(library.catalog().iter())?,
        Command::Song { id } => match library.track(id) {
            Some(track) => out.tracks([track])?,
            None => bail!("Track {} not found", id),
        },
        Command::Search { title } => match library.find_title(&title) {
            Some(track) => out.tracks([track])?,
            None => log::info!("No track titled {:?}", title),
        },
        Command::Find { query, limit } => out.tracks(library.search(&query, limit))?,
        Command::TracksAz => out.tracks(library.titles().in_order())?,
        Command::Play { id } => {
            if library.track(id).is_none() {
                log::warn!("Playing track {} which is not in the catalog", id);
            }
            open()?.record_play(id)?;
            println!("OK");
        }
        Command::Recent => {
            let session = open()?;
            out.tracks(library.resolve(&session.recents().snapshot()))?;
        }
        Command::Fav { action } => {
            let mut session = open()?;
            match action {
                FavAction::Add { id } => report(session.add_favorite(id)?),
                FavAction::Remove { id } => report(session.remove_favorite(id)?),
                FavAction::Check { id } => {
                    println!("{}", if session.is_favorite(id) { "YES" } else { "NO" })
                }
                FavAction::List => {
                    out.tracks(library.resolve(&session.favorites().to_vec()))?;
                }
            }
        }
        Command::Playlist { action } => {
            let mut session = open()?;
            match action {
                PlaylistAction::Create { id, name } => {
                    let id = id.unwrap_or_else(|| {
                        PlaylistId(chrono::Utc::now().timestamp().max(0) as u64)
                    });
                    let created = session.create_playlist(id, name.join(" "))?;
                    if created {
                        println!("{}", id);
                    } else {
                        report(false);
                    }
                }
                PlaylistAction::Add { playlist, song } => {
                    report(session.add_to_playlist(playlist, song)?)
                }
                PlaylistAction::Remove { playlist, song } => {
                    report(session.remove_from_playlist(playlist, song)?)
                }
                PlaylistAction::List => {
                    for summary in session.playlists().list() {
                        println!("{},{}", summary.id, summary.name);
                    }
                }
                PlaylistAction::Show { playlist } => match session.playlists().songs_of(playlist) {
                    Some(songs) => out.tracks(library.resolve(&songs))?,
                    None => bail!("Playlist {} not found", playlist),
                },
            }
        }
        Command::Recommend { id } => out.tracks(library.recommend_tracks(id))?,
    }

    Ok(())
}

fn report(changed: bool) {
    println!("{}", if changed { "OK" } else { "UNCHANGED" });
}

/// Track listing format
struct Output {
    json: bool,
}

impl Output {
    fn tracks<'a, I>(&self, tracks: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Arc<Track>>,
    {
        if self.json {
            let tracks: Vec<&Track> = tracks.into_iter().map(|t| t.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&tracks)?);
        } else {
            for track in tracks {
                println!("{}", track.to_line());
            }
        }
        Ok(())
    }
}
