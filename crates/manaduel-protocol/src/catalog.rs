//! Immutable card reference data.
//!
//! The catalog is the leaf of the whole system: every deck, hand, and
//! field card is a value copy of an entry here. The catalog itself is
//! read-only and safely shared across all sessions.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A unique identifier for a catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// One catalog entry: the reference stats for a card.
///
/// `image_url` is an opaque asset reference passed through to clients;
/// the engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCard {
    pub id: CardId,
    pub name: String,
    pub cost: u32,
    pub attack: i32,
    pub defense: i32,
    pub image_url: String,
}

/// The full card catalog, indexed by id.
///
/// Built once at server startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: Vec<CatalogCard>,
    by_id: HashMap<CardId, usize>,
}

impl CardCatalog {
    /// Builds a catalog from a list of cards.
    ///
    /// Later duplicates of the same id silently win; catalog data is
    /// expected to be clean at the source.
    pub fn new(cards: Vec<CatalogCard>) -> Self {
        let by_id = cards
            .iter()
            .enumerate()
            .map(|(idx, card)| (card.id, idx))
            .collect();
        Self { cards, by_id }
    }

    /// Looks up a card by id.
    pub fn get(&self, id: CardId) -> Option<&CatalogCard> {
        self.by_id.get(&id).map(|&idx| &self.cards[idx])
    }

    /// Returns `true` if the catalog contains the given id.
    pub fn contains(&self, id: CardId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Draws `count` distinct random cards as owned copies.
    ///
    /// This is the draft pool draw. If the catalog holds fewer than
    /// `count` cards, the whole catalog is returned (shuffled).
    pub fn draw_pool<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Vec<CatalogCard> {
        let mut indices: Vec<usize> = (0..self.cards.len()).collect();
        indices.shuffle(rng);
        indices
            .into_iter()
            .take(count)
            .map(|idx| self.cards[idx].clone())
            .collect()
    }

    /// Number of cards in the catalog.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(id: u32) -> CatalogCard {
        CatalogCard {
            id: CardId(id),
            name: format!("card-{id}"),
            cost: 1 + id % 5,
            attack: 1 + (id % 6) as i32,
            defense: 1 + (id % 7) as i32,
            image_url: format!("/cards/{id}.png"),
        }
    }

    fn catalog(n: u32) -> CardCatalog {
        CardCatalog::new((1..=n).map(card).collect())
    }

    #[test]
    fn test_get_returns_matching_card() {
        let cat = catalog(10);
        assert_eq!(cat.get(CardId(3)).unwrap().id, CardId(3));
        assert!(cat.get(CardId(99)).is_none());
    }

    #[test]
    fn test_draw_pool_returns_distinct_cards() {
        let cat = catalog(50);
        let mut rng = StdRng::seed_from_u64(1);

        let pool = cat.draw_pool(&mut rng, 30);

        assert_eq!(pool.len(), 30);
        let mut ids: Vec<_> = pool.iter().map(|c| c.id).collect();
        ids.sort_by_key(|c| c.0);
        ids.dedup();
        assert_eq!(ids.len(), 30, "pool must not contain duplicates");
    }

    #[test]
    fn test_draw_pool_caps_at_catalog_size() {
        let cat = catalog(5);
        let mut rng = StdRng::seed_from_u64(2);

        let pool = cat.draw_pool(&mut rng, 30);

        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_draw_pool_deterministic_with_seed() {
        let cat = catalog(40);
        let a = cat.draw_pool(&mut StdRng::seed_from_u64(7), 30);
        let b = cat.draw_pool(&mut StdRng::seed_from_u64(7), 30);
        assert_eq!(a, b);
    }
}
