//! Search results screen.

use super::{Card, Loadable, RequestTicket};
use oploverz_client::api::SearchResultItem;
use oploverz_client::{AnimeGateway, ApiResult};
use tracing::info;

#[derive(Debug, Default)]
pub struct SearchScreen {
    query: String,
    data: Loadable<Vec<SearchResultItem>>,
}

impl SearchScreen {
    /// The query is sent as given; only an empty one is skipped
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            data: Loadable::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn data(&self) -> &Loadable<Vec<SearchResultItem>> {
        &self.data
    }

    /// Run the search; an empty query fetches nothing
    pub async fn load<G: AnimeGateway>(&mut self, gateway: &G) {
        if self.query.is_empty() {
            self.data.mark_unavailable();
            return;
        }

        let ticket = self.begin();
        let result = gateway.search(&self.query).await;
        self.finish(ticket, result);
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.data.begin()
    }

    /// Apply results if `ticket` is still current
    pub fn finish(&mut self, ticket: RequestTicket, result: ApiResult<Vec<SearchResultItem>>) -> bool {
        if !self.data.finish(ticket, result) {
            return false;
        }

        info!(
            query = %self.query,
            results = self.data.ready().map_or(0, Vec::len),
            "Search finished"
        );
        true
    }

    pub fn results(&self) -> Vec<Card> {
        self.data
            .ready()
            .map(|items| items.iter().map(result_card).collect())
            .unwrap_or_default()
    }
}

/// Card for a search hit: status as subtitle, else the score; type as overlay
fn result_card(result: &SearchResultItem) -> Card {
    let subtitle = match (&result.status, result.score) {
        (Some(status), _) if !status.is_empty() => status.clone(),
        (_, Some(score)) if score != 0.0 => format!("Score: {score}"),
        _ => String::new(),
    };

    Card::new(
        &result.item.title,
        result.item.poster.as_deref(),
        &result.item.original_link,
        &result.item.link,
    )
    .with_subtitle(subtitle)
    .with_overlay(result.anime_type.clone().unwrap_or_default())
}
