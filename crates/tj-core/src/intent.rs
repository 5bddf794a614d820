//! Declared route intents and the binary per-tick action.

use std::fmt;

use crate::{TjError, TjResult};

/// The manoeuvre a vehicle declares it will perform at the junction.
///
/// Supplied by the environment as a one-hot vector over
/// `[FORWARD, TURN_RIGHT, TURN_LEFT]`; never inferred by the agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteIntent {
    Forward,
    TurnRight,
    TurnLeft,
}

impl RouteIntent {
    pub const ALL: [RouteIntent; 3] = [RouteIntent::Forward, RouteIntent::TurnRight, RouteIntent::TurnLeft];

    /// Decode a one-hot feature triple.  A flag counts as set when `>= 0.5`.
    ///
    /// Returns `None` unless exactly one flag is set.
    pub fn from_one_hot(flags: &[f32]) -> Option<RouteIntent> {
        if flags.len() != 3 {
            return None;
        }
        let mut set = flags.iter().enumerate().filter(|(_, v)| **v >= 0.5);
        match (set.next(), set.next()) {
            (Some((i, _)), None) => Some(Self::ALL[i]),
            _ => None,
        }
    }

    /// One-hot encoding in `[FORWARD, TURN_RIGHT, TURN_LEFT]` order.
    pub fn one_hot(self) -> [f32; 3] {
        let mut v = [0.0; 3];
        v[self as usize] = 1.0;
        v
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteIntent::Forward   => "forward",
            RouteIntent::TurnRight => "right",
            RouteIntent::TurnLeft  => "left",
        }
    }
}

impl fmt::Display for RouteIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The per-tick decision of one agent.
///
/// Encoded on the environment boundary as `0` (advance) / `1` (yield).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    #[default]
    Advance,
    Yield,
}

impl Action {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Action::Advance => 0,
            Action::Yield   => 1,
        }
    }

    pub fn from_code(code: u8) -> TjResult<Action> {
        match code {
            0 => Ok(Action::Advance),
            1 => Ok(Action::Yield),
            other => Err(TjError::InvalidAction(other)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Advance => "advance",
            Action::Yield   => "yield",
        })
    }
}
