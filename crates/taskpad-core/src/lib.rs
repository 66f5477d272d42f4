//! Task list state machine for taskpad.
//!
//! The crate holds everything that does not need a terminal: the ordered
//! task list with its single edit session ([`BoardState`]), the views derived
//! from it ([`projection`]) and relative age labels ([`age`]).

/// Relative age labels.
pub mod age;
/// Task list state and mutations.
pub mod board;
/// Filter selector.
pub mod filter;
/// Identifier types.
pub mod id;
/// Views derived from the board.
pub mod projection;
/// Task record, edit policy and layout options.
pub mod task;

pub use age::{elapsed_days, format_age};
pub use board::{
    AddOutcome, BoardState, Command, DeleteOutcome, EditOutcome, EditSession, InvalidBoardState,
    Outcome, SaveOutcome, ToggleOutcome,
};
pub use filter::{Filter, ParseFilterError};
pub use id::TaskId;
pub use projection::{EMPTY_BOARD_MESSAGE, Sections, Summary};
pub use task::{EditPolicy, Layout, ParseEditPolicyError, ParseLayoutError, Task};
