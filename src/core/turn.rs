//! Turn instruction codes
//!
//! `TurnInstruction` is what the search attaches to every path sample.
//! `InstructionCode` is what a rendered instruction row carries: either a
//! plain turn, a consolidated roundabout traversal with its exit ordinal, or
//! the synthetic arrival row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Turn instruction attached to a path sample, numeric codes are stable wire values
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TurnInstruction {
    #[default]
    NoTurn = 0,
    GoStraight = 1,
    TurnSlightRight = 2,
    TurnRight = 3,
    TurnSharpRight = 4,
    UTurn = 5,
    TurnSharpLeft = 6,
    TurnLeft = 7,
    TurnSlightLeft = 8,
    ReachViaLocation = 9,
    HeadOn = 10,
    EnterRoundAbout = 11,
    LeaveRoundAbout = 12,
    StayOnRoundAbout = 13,
    StartAtEndOfStreet = 14,
    ReachedYourDestination = 15,
    EnterAgainstAllowedDirection = 16,
    LeaveAgainstAllowedDirection = 17,
}

impl TurnInstruction {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<TurnInstruction> {
        use TurnInstruction::*;
        let turn = match v {
            0 => NoTurn,
            1 => GoStraight,
            2 => TurnSlightRight,
            3 => TurnRight,
            4 => TurnSharpRight,
            5 => UTurn,
            6 => TurnSharpLeft,
            7 => TurnLeft,
            8 => TurnSlightLeft,
            9 => ReachViaLocation,
            10 => HeadOn,
            11 => EnterRoundAbout,
            12 => LeaveRoundAbout,
            13 => StayOnRoundAbout,
            14 => StartAtEndOfStreet,
            15 => ReachedYourDestination,
            16 => EnterAgainstAllowedDirection,
            17 => LeaveAgainstAllowedDirection,
            _ => return None,
        };
        Some(turn)
    }

    /// Whether a sample carrying this instruction is worth surfacing to the user.
    ///
    /// Staying on a roundabout is folded into the exit ordinal of the
    /// surrounding enter/leave pair, so it never stands on its own.
    pub fn is_necessary(self) -> bool {
        !matches!(self, TurnInstruction::NoTurn | TurnInstruction::StayOnRoundAbout)
    }
}

impl From<TurnInstruction> for u8 {
    fn from(turn: TurnInstruction) -> u8 {
        turn.code()
    }
}

impl TryFrom<u8> for TurnInstruction {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        TurnInstruction::from_u8(v).ok_or_else(|| format!("unknown turn instruction code {v}"))
    }
}

/// Instruction code of a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionCode {
    /// A single turn, rendered as its numeric code
    Turn(TurnInstruction),
    /// A whole roundabout traversal; `exit` is 1-based
    Roundabout { exit: u32 },
    /// The synthetic destination row closing every instruction list
    Arrived,
}

impl fmt::Display for InstructionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionCode::Turn(turn) => write!(f, "{}", turn.code()),
            InstructionCode::Roundabout { exit } => {
                write!(f, "{}-{}", TurnInstruction::EnterRoundAbout.code(), exit)
            }
            InstructionCode::Arrived => {
                write!(f, "{}", TurnInstruction::ReachedYourDestination.code())
            }
        }
    }
}

impl Serialize for InstructionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
