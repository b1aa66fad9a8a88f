//! NimeStream terminal client.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nimestream::render;
use nimestream::screens::{
    DetailScreen, HomeEvent, HomeScreen, SearchScreen, StreamScreen, WatchlistScreen,
};
use nimestream::Route;
use oploverz_client::OploverzClient;
use serde::Serialize;
use shared::{extract_path, AnimeBase, Config, DataPaths, FileSlot, MemorySlot, StorageSlot, WatchlistStore};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};

type Store = WatchlistStore<Box<dyn StorageSlot>>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Keep the watchlist in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Print loaded data as JSON instead of rendering it
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the home feed
    Home {
        /// Keep the carousel running until Ctrl-C
        #[arg(long)]
        follow: bool,

        /// Never show the promotional popup
        #[arg(long)]
        no_promo: bool,
    },

    /// Show a series and its episodes
    Detail {
        /// Series path or full URL
        url: String,

        /// Save or unsave the series after loading it
        #[arg(long)]
        toggle_watchlist: bool,
    },

    /// Show stream sources for an episode
    Stream {
        /// Episode path or full URL
        url: String,

        /// Play the source at this index instead of the default
        #[arg(long)]
        quality: Option<usize>,
    },

    /// Search by title
    Search { query: String },

    /// Manage the saved watchlist
    Watchlist {
        #[command(subcommand)]
        action: Option<WatchlistAction>,
    },

    /// Open a client route such as `/detail?url=%2Fseries%2Fx`
    Open { route: String },
}

#[derive(Subcommand, Debug)]
enum WatchlistAction {
    /// List saved entries, newest first
    List,

    /// Save an entry
    Add {
        /// Series path or full URL
        url: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        image: Option<String>,
    },

    /// Remove entries matching a link or original link
    Remove { key: String },
}

struct App {
    config: Config,
    client: OploverzClient,
    store: Store,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "nimestream".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!(config_file = %args.config.display(), "NimeStream starting");

    // Initialize data paths
    let data_paths = DataPaths::new(config.data_dir());
    data_paths
        .create_dirs()
        .context("Failed to create data directories")?;
    info!(data_dir = %data_paths.root().display(), "Data directory ready");

    let key = config.storage.watchlist_key.as_str();
    let slot: Box<dyn StorageSlot> = if args.ephemeral {
        info!("Watchlist kept in memory only");
        Box::new(MemorySlot::new(key))
    } else {
        Box::new(FileSlot::new(&data_paths, key))
    };
    let store = WatchlistStore::initialize(slot);
    info!(entries = store.len(), "Watchlist ready");

    let client = OploverzClient::from_config(&config).context("Failed to create API client")?;
    info!(base_url = %client.base_url(), "API client ready");

    let mut app = App {
        config,
        client,
        store,
        json: args.json,
    };

    match args.command {
        Command::Home { follow, no_promo } => app.home(follow, !no_promo).await,
        Command::Detail {
            url,
            toggle_watchlist,
        } => app.detail(Some(extract_path(&url)), toggle_watchlist).await,
        Command::Stream { url, quality } => app.stream(Some(extract_path(&url)), quality).await,
        Command::Search { query } => app.search(&query).await,
        Command::Watchlist { action } => app.watchlist(action.unwrap_or(WatchlistAction::List)),
        Command::Open { route } => {
            let route = Route::parse(&route)?;
            info!(route = %route, "Opening route");
            app.open(route).await
        }
    }
}

impl App {
    async fn open(&mut self, route: Route) -> Result<()> {
        match route {
            Route::Home => self.home(false, false).await,
            Route::Detail { url } => self.detail(url, false).await,
            Route::Stream { url } => self.stream(url, None).await,
            Route::Search { query } => self.search(&query).await,
            Route::Watchlist => self.watchlist(WatchlistAction::List),
        }
    }

    async fn home(&mut self, follow: bool, show_promo: bool) -> Result<()> {
        let mut screen = HomeScreen::new();
        screen.load(&self.client).await;

        if self.json {
            return print_json(&screen.data().ready());
        }

        let mut out = io::stdout().lock();
        render::home(&mut out, &screen, &self.config.ui)?;
        out.flush()?;
        drop(out);

        if !follow || screen.data().ready().is_none() {
            return Ok(());
        }

        let mut events = screen.start_timers(&self.config.ui, show_promo);
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    screen.apply(event);

                    let mut out = io::stdout().lock();
                    match event {
                        HomeEvent::AdvanceCarousel => {
                            writeln!(out)?;
                            render::carousel(&mut out, &screen)?;
                        }
                        HomeEvent::ShowPromo => render::promo(&mut out, &screen)?,
                    }
                    out.flush()?;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping home screen");
                    break;
                }
            }
        }

        screen.stop_timers();
        Ok(())
    }

    async fn detail(&mut self, url: Option<String>, toggle: bool) -> Result<()> {
        let mut screen = DetailScreen::new(url);
        screen.load(&self.client).await;

        if toggle {
            match screen.toggle_watchlist(&mut self.store) {
                Some(true) => info!(url = ?screen.url(), "Added to watchlist"),
                Some(false) => info!(url = ?screen.url(), "Removed from watchlist"),
                None => warn!("Nothing loaded, watchlist unchanged"),
            }
        }

        if self.json {
            return print_json(&screen.data().ready());
        }

        let mut out = io::stdout().lock();
        render::detail(&mut out, &screen, &self.store, &self.config.ui)?;
        Ok(())
    }

    async fn stream(&mut self, url: Option<String>, quality: Option<usize>) -> Result<()> {
        let mut screen = StreamScreen::new(url, &self.config.ui.preferred_quality);
        screen.load(&self.client).await;

        if let Some(index) = quality {
            if !screen.select(index) {
                warn!(index = index, "No stream source at that index, keeping the default");
            }
        }

        if self.json {
            return print_json(&screen.data().ready());
        }

        let mut out = io::stdout().lock();
        render::stream(&mut out, &screen)?;
        Ok(())
    }

    async fn search(&mut self, query: &str) -> Result<()> {
        let mut screen = SearchScreen::new(query);
        screen.load(&self.client).await;

        if self.json {
            return print_json(&screen.data().ready());
        }

        let mut out = io::stdout().lock();
        render::search(&mut out, &screen, &self.config.ui)?;
        Ok(())
    }

    fn watchlist(&mut self, action: WatchlistAction) -> Result<()> {
        let screen = WatchlistScreen::new();

        match action {
            WatchlistAction::List => {}
            WatchlistAction::Add { url, title, image } => {
                let mut anime = AnimeBase::new(title, extract_path(&url));
                if let Some(image) = image {
                    anime = anime.with_image(image);
                }
                if !self.store.add(anime) {
                    warn!(url = %url, "Already in watchlist");
                }
            }
            WatchlistAction::Remove { key } => {
                let mut removed = self.store.remove(&key);
                let path = extract_path(&key);
                if removed == 0 && path != key {
                    removed = self.store.remove(&path);
                }
                info!(key = %key, removed = removed, "Watchlist removal");
            }
        }

        if self.json {
            return print_json(&self.store.items());
        }

        let mut out = io::stdout().lock();
        render::watchlist(&mut out, &screen.cards(&self.store), &self.config.ui)?;
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
