//! Page URL synchronisation.
//!
//! `QuerySync` is the only code that reads or writes the page query string.
//! The recognised keys (`mark`, `model`, `volume`, `year`) always mirror the
//! selection; every other key is carried over untouched.

use crate::domain::model::{Level, Selection};
use crate::utils::error::Result;
use std::str::FromStr;
use url::{form_urlencoded, Url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySync {
    url: Url,
}

impl QuerySync {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(page_url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(page_url)?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Reads the selection out of the query string.
    ///
    /// Missing or empty keys stay unset, as do numbers that do not parse.
    /// When a key repeats, the first occurrence wins.
    pub fn read_selection(&self) -> Selection {
        let mut selection = Selection::default();
        for (key, value) in self.url.query_pairs() {
            let Some(level) = Level::from_key(&key) else {
                continue;
            };
            if value.is_empty() || selection.is_set(level) {
                continue;
            }
            match level {
                Level::Mark => selection.mark = Some(value.into_owned()),
                Level::Model => selection.model = Some(value.into_owned()),
                Level::Volume => selection.volume = parse_number(level, &value),
                Level::Year => selection.year = parse_number(level, &value),
            }
        }
        selection
    }

    /// Rewrites the recognised keys from `selection`.
    ///
    /// Every other `key[=value]` piece is copied over byte for byte, so bare
    /// flags and the original percent encoding survive.
    pub fn write_selection(&mut self, selection: &Selection) {
        let mut pieces: Vec<String> = self
            .url
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|piece| !piece.is_empty() && !is_selection_piece(piece))
            .map(str::to_owned)
            .collect();

        let owned = selection.query_pairs();
        if !owned.is_empty() {
            pieces.push(
                form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(owned)
                    .finish(),
            );
        }

        if pieces.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(&pieces.join("&")));
        }
        tracing::debug!("Page URL is now {}", self.url);
    }
}

fn is_selection_piece(piece: &str) -> bool {
    form_urlencoded::parse(piece.as_bytes())
        .next()
        .is_some_and(|(key, _)| Level::from_key(&key).is_some())
}

fn parse_number<T: FromStr>(level: Level, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(number) => Some(number),
        Err(_) => {
            tracing::warn!("Ignoring non-numeric {} '{}' in page URL", level, raw);
            None
        }
    }
}
