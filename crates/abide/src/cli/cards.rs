//! Devotional card command handlers

use abide_core::Abide;
use abide_core::cards::{CARD_COST, builtin_pool, load_pool};
use abide_core::config::Config;
use abide_core::model::{CardContent, JesusSaidCard};

use crate::cli::args::CardCommands;
use crate::cli::util::{confirm, delete_records, report_unreadable, short_id};

/// Handle the cards command. Returns true on success.
pub fn handle_cards_command(app: &Abide, config: &Config, command: CardCommands) -> bool {
    let pool = match load_card_pool(config) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("✗ Could not load card pool: {}", e);
            return false;
        }
    };
    let mut deck = app.cards(pool);

    match command {
        CardCommands::List { search } => {
            let cards = deck.cards_mut();
            cards.set_search(search.unwrap_or_default());
            let view = cards.view();
            report_unreadable(cards);
            if view.is_empty() {
                println!("No cards collected yet.");
            }
            for card in &view {
                println!("{}", summary_line(card));
            }
            println!(
                "{} collected, {} left to draw",
                deck.cards().len(),
                deck.remaining().len()
            );
            true
        }

        CardCommands::Draw { yes } => {
            let card = match deck.draw(&mut rand::thread_rng()) {
                Ok(card) => card,
                Err(e) => {
                    eprintln!("✗ {}", e);
                    return false;
                }
            };

            print_card(&card);
            println!("({} grace points left)", deck.points());

            if !yes && !confirm("Keep this card?") {
                println!("Card left behind.");
                return true;
            }
            match deck.collect(card) {
                Ok(()) => {
                    println!("✓ Card collected");
                    true
                }
                Err(e) => {
                    eprintln!("✗ Error collecting card: {}", e);
                    false
                }
            }
        }

        CardCommands::Delete(args) => {
            delete_records(deck.cards_mut(), &args.ids, args.yes, summary_line)
        }

        CardCommands::Points => {
            let points = deck.points();
            println!("Grace points: {}", points);
            println!("A card costs {}; you can draw {}.", CARD_COST, points.max(0) / CARD_COST);
            true
        }
    }
}

fn load_card_pool(config: &Config) -> abide_core::Result<Vec<CardContent>> {
    match &config.card_pool {
        Some(path) => load_pool(path),
        None => builtin_pool(),
    }
}

fn print_card(card: &JesusSaidCard) {
    println!();
    println!("  {}", card.verse);
    println!();
    println!("  {}", card.message);
    println!();
    println!("  Prayer: {}", card.prayer);
    println!();
}

fn summary_line(card: &JesusSaidCard) -> String {
    format!("{}  {}  {}", short_id(&card.id), card.date, card.verse)
}
