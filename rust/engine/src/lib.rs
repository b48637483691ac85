//! # holdem-engine: Texas Hold'em Rules Engine
//!
//! Sequences hands of Texas Hold'em through their streets, enforces betting
//! legality under fixed-limit or no-limit structures, settles the pot
//! (including side pots when players are all-in) and evaluates showdown
//! hands. Every step is reported on an ordered event stream for a transport
//! layer to fan out.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and display
//! - [`deck`] - Draw-once deck with seeded ChaCha20 shuffling
//! - [`hand`] - Five-card hand ranking and best-of-seven selection
//! - [`player`] - Player identity, stack and actions
//! - [`table`] - Seating, button and turn order
//! - [`rules`] - Fixed-limit and no-limit betting structures
//! - [`round`] - One street of betting: blinds, turns, re-opening
//! - [`pot`] - Contribution ledger, side pots and awards
//! - [`engine`] - The hand state machine
//! - [`events`] - Event types and the ordered event stream
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`logging`] - Tracing setup and a capturing layer for tests
//! - [`errors`] - Error types for contract violations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{best_ranking, Category};
//!
//! // Best five of seven cards
//! let cards = parse_cards("Ah Kh Qh Jh 10h 2c 3d").unwrap();
//! let ranking = best_ranking(&cards).unwrap();
//! assert_eq!(ranking.category, Category::RoyalFlush);
//! ```
//!
//! ## Deterministic Dealing
//!
//! ```rust
//! use holdem_engine::deck::Deck;
//!
//! // Same seed produces same shuffle
//! let mut deck1 = Deck::new_with_seed(42);
//! let mut deck2 = Deck::new_with_seed(42);
//! assert_eq!(deck1.draw().unwrap(), deck2.draw().unwrap());
//! ```
//!
//! ## Running a Hand
//!
//! ```rust
//! use holdem_engine::engine::Engine;
//! use holdem_engine::events::EventKind;
//! use holdem_engine::player::{Player, PlayerAction};
//!
//! let (mut engine, mut events) = Engine::new(4, None);
//! let a = engine.add_player(Player::new("alice", 50)).unwrap();
//! let b = engine.add_player(Player::new("bob", 50)).unwrap();
//! engine.start().unwrap();
//!
//! // Acting out of turn is reported, not fatal.
//! engine.apply_action(b, PlayerAction::bet(2)).unwrap();
//! let last = events.drain().pop().unwrap();
//! assert_eq!(last.kind, EventKind::OutOfTurn { player_id: b });
//! # let _ = a;
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod hand;
pub mod history;
pub mod logging;
pub mod player;
pub mod pot;
pub mod round;
pub mod rules;
pub mod table;
