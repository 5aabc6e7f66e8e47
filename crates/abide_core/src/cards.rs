//! Devotional card draws.
//!
//! Drawing costs [`CARD_COST`] grace points and picks uniformly among the
//! pool entries whose verse has not been collected yet. A drawn card is not
//! kept until it is [collected](CardDeck::collect).

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::bridge::{Binding, BindingOptions};
use crate::collection::CollectionController;
use crate::date::today_iso;
use crate::error::{AbideError, Result};
use crate::keys::{GRACE_POINTS, JESUS_SAID_CARDS};
use crate::model::{CardContent, JesusSaidCard};
use crate::store::Store;

/// Grace points spent per draw.
pub const CARD_COST: i64 = 3;

const BUILTIN_POOL: &str = include_str!("../data/cards.json");

/// Why a draw was refused. Points are untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Not enough grace points.
    #[error("Not enough grace points: have {available}, need {required}")]
    InsufficientPoints {
        /// Points available.
        available: i64,
        /// Points a draw costs.
        required: i64,
    },

    /// Every card in the pool has been collected.
    #[error("Every card has been collected")]
    AllCollected,
}

/// Collected-cards list controller.
pub type CardsController = CollectionController<JesusSaidCard>;

/// The bundled card pool.
pub fn builtin_pool() -> Result<Vec<CardContent>> {
    Ok(serde_json::from_str(BUILTIN_POOL)?)
}

/// Read a card pool from a JSON array of `{verse, message, prayer}` objects.
pub fn load_pool(path: &Path) -> Result<Vec<CardContent>> {
    let content = std::fs::read_to_string(path).map_err(|source| AbideError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Pool entries whose verse is not among `collected`.
pub fn remaining_cards<'a>(
    pool: &'a [CardContent],
    collected: &[JesusSaidCard],
) -> Vec<&'a CardContent> {
    pool.iter()
        .filter(|content| !collected.iter().any(|card| card.verse == content.verse))
        .collect()
}

/// The card pool, the collected cards and the grace points that pay for draws.
pub struct CardDeck {
    pool: Vec<CardContent>,
    cards: CardsController,
    points: Binding<i64>,
}

impl CardDeck {
    /// Open the deck over `pool`.
    pub fn open(store: &Store, pool: Vec<CardContent>, options: BindingOptions) -> Self {
        Self {
            pool,
            cards: CollectionController::open(store, JESUS_SAID_CARDS, options),
            points: Binding::open_with(store, GRACE_POINTS, 0, options),
        }
    }

    /// Current grace points.
    pub fn points(&self) -> i64 {
        self.points.get()
    }

    /// The collected cards.
    pub fn cards(&self) -> &CardsController {
        &self.cards
    }

    /// Mutable access to the collected cards (search, select, delete).
    pub fn cards_mut(&mut self) -> &mut CardsController {
        &mut self.cards
    }

    /// Pool entries not collected yet.
    pub fn remaining(&self) -> Vec<&CardContent> {
        let collected = self.cards.records();
        remaining_cards(&self.pool, &collected)
    }

    /// Draw a card and pay for it.
    ///
    /// Points are checked before the pool, so a user without points is told
    /// so even when nothing is left to draw.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<JesusSaidCard> {
        let available = self.points();
        if available < CARD_COST {
            return Err(DrawError::InsufficientPoints {
                available,
                required: CARD_COST,
            }
            .into());
        }

        let remaining = self.remaining();
        let content = remaining.choose(rng).ok_or(DrawError::AllCollected)?;
        let card = JesusSaidCard::from_content(content, today_iso());

        self.points.try_set(available - CARD_COST)?;
        log::debug!("Drew card {}, {} points left", card.id, available - CARD_COST);
        Ok(card)
    }

    /// Keep a drawn card. The collection stays sorted by date, newest first.
    pub fn collect(&mut self, card: JesusSaidCard) -> Result<()> {
        self.cards.save(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn content(verse: &str) -> CardContent {
        CardContent {
            verse: verse.into(),
            message: format!("message for {verse}"),
            prayer: "Amen".into(),
        }
    }

    fn deck(points: i64, pool: Vec<CardContent>) -> (Store, CardDeck) {
        let store = Store::new(InMemoryStorage::new());
        store.write(GRACE_POINTS, &points).unwrap();
        let deck = CardDeck::open(&store, pool, BindingOptions::default());
        (store, deck)
    }

    #[test]
    fn test_builtin_pool_parses() {
        let pool = builtin_pool().unwrap();
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_draw_refused_below_cost() {
        let (store, deck) = deck(2, vec![content("John 1:1")]);
        let err = deck.draw(&mut StdRng::seed_from_u64(7)).unwrap_err();
        assert!(matches!(
            err,
            AbideError::Draw(DrawError::InsufficientPoints {
                available: 2,
                required: 3
            })
        ));
        assert_eq!(store.read(GRACE_POINTS, 0), 2);
    }

    #[test]
    fn test_draw_from_last_remaining_card() {
        let (store, mut deck) = deck(5, vec![content("John 1:1"), content("John 3:16")]);
        deck.collect(JesusSaidCard::from_content(&content("John 1:1"), "2024-01-01"))
            .unwrap();

        let card = deck.draw(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(card.verse, "John 3:16");
        assert_eq!(store.read(GRACE_POINTS, 0), 2);
        assert_eq!(deck.points(), 2);
        // Drawing does not collect
        assert_eq!(deck.cards().len(), 1);
    }

    #[test]
    fn test_draw_refused_when_all_collected() {
        let (store, mut deck) = deck(9, vec![content("John 1:1")]);
        deck.collect(JesusSaidCard::from_content(&content("John 1:1"), "2024-01-01"))
            .unwrap();

        let err = deck.draw(&mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(err, AbideError::Draw(DrawError::AllCollected)));
        assert_eq!(store.read(GRACE_POINTS, 0), 9);
    }

    #[test]
    fn test_collect_sorts_newest_first() {
        let (_store, mut deck) = deck(0, Vec::new());
        deck.collect(JesusSaidCard::from_content(&content("a"), "2024-01-01"))
            .unwrap();
        deck.collect(JesusSaidCard::from_content(&content("b"), "2024-06-01"))
            .unwrap();
        let verses: Vec<_> = deck.cards().records().into_iter().map(|c| c.verse).collect();
        assert_eq!(verses, vec!["b", "a"]);
    }

    #[test]
    fn test_seeded_draws_are_deterministic() {
        let pool: Vec<_> = (1..=10).map(|i| content(&format!("v{i}"))).collect();
        let (_s1, first) = deck(3, pool.clone());
        let (_s2, second) = deck(3, pool);
        let a = first.draw(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = second.draw(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.verse, b.verse);
    }
}
