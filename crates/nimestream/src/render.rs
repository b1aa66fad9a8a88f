//! Plain-text rendering of screens to any writer.

use crate::screens::{Card, DetailScreen, HomeScreen, SearchScreen, StreamScreen, ViewState};
use shared::config::UiConfig;
use shared::{StorageSlot, WatchlistStore};
use std::io::{self, Write};

const NO_DESCRIPTION: &str = "No description available.";

fn cards<W: Write>(out: &mut W, heading: &str, cards: &[Card], ui: &UiConfig) -> io::Result<()> {
    if cards.is_empty() {
        return Ok(());
    }

    writeln!(out, "\n== {heading} ==")?;
    for (idx, card) in cards.iter().enumerate() {
        write!(out, "{:>3}. {}", idx + 1, card.title)?;
        if let Some(overlay) = &card.overlay {
            write!(out, " [{overlay}]")?;
        }
        if let Some(subtitle) = &card.subtitle {
            write!(out, " - {subtitle}")?;
        }
        writeln!(out)?;
        writeln!(out, "     {}", card.route)?;
        writeln!(out, "     image: {}", card.image_or(&ui.placeholder_image))?;
    }
    Ok(())
}

pub fn home<W: Write>(out: &mut W, screen: &HomeScreen, ui: &UiConfig) -> io::Result<()> {
    match screen.data().state() {
        ViewState::Loading => return writeln!(out, "Loading..."),
        ViewState::Unavailable => return writeln!(out, "Failed to load content."),
        ViewState::Ready(_) => {}
    }

    carousel(out, screen)?;

    if let Some(sections) = screen.sections() {
        cards(out, "Latest Releases", &sections.latest_releases, ui)?;
        cards(out, "Trending", &sections.trending, ui)?;
        cards(out, "New Additions", &sections.new_additions, ui)?;
    }

    promo(out, screen)
}

/// Current carousel slide with position indicator
pub fn carousel<W: Write>(out: &mut W, screen: &HomeScreen) -> io::Result<()> {
    let Some(slide) = screen.current_slide() else {
        return Ok(());
    };

    let total = screen.carousel_items().len();
    let dots: String = (0..total)
        .map(|i| if i == screen.carousel().current() { '●' } else { '○' })
        .collect();

    writeln!(out, "[{}/{}] {}  {}", screen.carousel().current() + 1, total, slide.item.title, dots)?;
    if !slide.description.is_empty() {
        writeln!(out, "      {}", slide.description)?;
    }
    if let Some(route) = screen.current_slide_route() {
        writeln!(out, "      watch: {route}")?;
    }
    Ok(())
}

pub fn promo<W: Write>(out: &mut W, screen: &HomeScreen) -> io::Result<()> {
    if screen.promo().is_visible() {
        writeln!(out, "\n** Powered by NextA API: https://nexta-api.vercel.app/ **")?;
    }
    Ok(())
}

pub fn detail<W: Write, S: StorageSlot>(
    out: &mut W,
    screen: &DetailScreen,
    store: &WatchlistStore<S>,
    ui: &UiConfig,
) -> io::Result<()> {
    let detail = match screen.data().state() {
        ViewState::Loading => return writeln!(out, "Loading..."),
        ViewState::Unavailable => return writeln!(out, "Anime not found."),
        ViewState::Ready(detail) => detail,
    };

    writeln!(out, "{}", detail.title)?;
    if !detail.japanese_title.is_empty() {
        writeln!(out, "{}", detail.japanese_title)?;
    }
    let info = &detail.information;
    if !info.genres.is_empty() {
        writeln!(out, "Genres: {}", info.genres.join(", "))?;
    }
    writeln!(out, "Status: {}  Studio: {}", info.status, info.studio)?;
    let poster = if detail.poster.is_empty() {
        ui.placeholder_image.as_str()
    } else {
        detail.poster.as_str()
    };
    writeln!(out, "Poster: {poster}")?;
    writeln!(
        out,
        "Watchlist: {}",
        if screen.is_saved(store) { "saved" } else { "not saved" }
    )?;

    writeln!(out, "\n== Synopsis ==")?;
    if detail.description.is_empty() {
        writeln!(out, "{NO_DESCRIPTION}")?;
    } else {
        writeln!(out, "{}", detail.description)?;
    }

    writeln!(out, "\n== Episodes ==")?;
    let episodes = screen.episodes();
    if episodes.is_empty() {
        writeln!(out, "No episodes yet.")?;
    }
    for ep in episodes {
        writeln!(out, "  {} ({})", ep.label, ep.release_date)?;
        writeln!(out, "     {}", ep.route)?;
    }
    Ok(())
}

pub fn stream<W: Write>(out: &mut W, screen: &StreamScreen) -> io::Result<()> {
    let stream = match screen.data().state() {
        ViewState::Loading => return writeln!(out, "Loading..."),
        ViewState::Unavailable => return writeln!(out, "Stream not available."),
        ViewState::Ready(stream) => stream,
    };

    let episode = &stream.episode_info.episode_number;
    if stream.title.is_empty() {
        writeln!(out, "Episode {episode}")?;
    } else {
        writeln!(out, "{}", stream.title)?;
    }
    let released = if stream.episode_info.released_at.is_empty() {
        "N/A"
    } else {
        stream.episode_info.released_at.as_str()
    };
    writeln!(out, "Episode {episode} · {released}")?;

    match screen.active_stream() {
        Some(link) => writeln!(out, "\nPlaying: {}", link.url)?,
        None => writeln!(out, "\nNo stream source selected.")?,
    }

    writeln!(out, "\n== Stream Quality ==")?;
    let labels = screen.server_labels();
    if labels.is_empty() {
        writeln!(out, "No stream links available.")?;
    }
    for (idx, label) in labels.iter().enumerate() {
        let marker = if screen.active_index() == Some(idx) { '*' } else { ' ' };
        writeln!(out, " {marker} [{idx}] {label}")?;
    }

    if let Some(prev) = screen.prev_route() {
        writeln!(out, "\nPrevious episode: {prev}")?;
    }
    if let Some(next) = screen.next_route() {
        writeln!(out, "Next episode: {next}")?;
    }

    let downloads = screen.downloads();
    if !downloads.is_empty() {
        writeln!(out, "\n== Downloads ==")?;
        for (container, quality) in downloads {
            writeln!(out, "  {} ({container})", quality.quality)?;
            for link in &quality.links {
                writeln!(out, "     {}: {}", link.host, link.url)?;
            }
        }
    }
    Ok(())
}

pub fn search<W: Write>(out: &mut W, screen: &SearchScreen, ui: &UiConfig) -> io::Result<()> {
    writeln!(out, "Search results for \"{}\"", screen.query())?;
    match screen.data().state() {
        ViewState::Loading => writeln!(out, "Loading..."),
        ViewState::Unavailable => writeln!(out, "Enter a title to search."),
        ViewState::Ready(_) => {
            let results = screen.results();
            if results.is_empty() {
                writeln!(out, "No anime found.")
            } else {
                cards(out, "Results", &results, ui)
            }
        }
    }
}

pub fn watchlist<W: Write>(out: &mut W, saved: &[Card], ui: &UiConfig) -> io::Result<()> {
    writeln!(out, "My Watchlist ({})", saved.len())?;
    if saved.is_empty() {
        writeln!(out, "Your watchlist is empty. Save anime from a detail page to see it here.")?;
        return Ok(());
    }
    cards(out, "Saved", saved, ui)
}
