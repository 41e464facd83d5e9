//! The move-generation substrate of a chess engine: bitboard primitives,
//! precomputed geometry tables, magic bitboards for sliding-piece attacks,
//! a compact 16-bit move encoding, and a `Position` (mailbox plus parallel
//! bitboards) with an incrementally maintained Zobrist-hashed history.
//!
//! This crate deliberately stops short of search, evaluation, or a legality
//! pipeline -- it is the substrate those things are built on, not an engine
//! itself. What it does provide is single-threaded and allocation-free on
//! the hot path (`Position::do_move`/`undo_move`), which is what lets a
//! search layer built on top of it run fast.
//!
//! # Usage
//!
//! Static tables (geometry and magic bitboards) must be built once before
//! constructing a `Position`:
//!
//! ```
//! use castellan::helper;
//! use castellan::board::Position;
//!
//! helper::init().expect("table init should succeed");
//! let pos = Position::start_pos();
//! assert_eq!(pos.active_color(), castellan::core::Color::White);
//! ```
//!
//! Applying and undoing moves:
//!
//! ```
//! use castellan::helper;
//! use castellan::board::Position;
//! use castellan::core::piece_move::Move;
//! use castellan::core::sq::Square;
//!
//! helper::init().unwrap();
//! let mut pos = Position::start_pos();
//! let m = Move::new_normal(Square::from_str("e2"), Square::from_str("e4"));
//! pos.do_move(m);
//! pos.undo_move(m);
//! ```

#![allow(dead_code)]

pub mod board;
pub mod core;
pub mod error;
pub mod helper;
pub mod tools;

pub use board::Position;
pub use core::bitboard::BitBoard;
pub use core::piece_move::Move;
pub use core::sq::Square;
pub use core::{Color, Piece, PieceType};
pub use error::{FenError, MagicError};
