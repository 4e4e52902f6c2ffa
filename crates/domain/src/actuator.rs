//! Actuator state: the current controllable state of an actuator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current state held by an actuator.
///
/// Switch-like devices use [`On`](Self::On)/[`Off`](Self::Off); devices with a
/// scalar target (thermostats, dimmers) use [`Level`](Self::Level).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorState {
    On,
    Off,
    Level(f64),
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Level(level) => write!(f, "level:{level}"),
        }
    }
}

/// Text that is not a valid [`ActuatorState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid actuator state {0:?}")]
pub struct ParseStateError(String);

impl FromStr for ActuatorState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => other
                .strip_prefix("level:")
                .and_then(|level| level.parse().ok())
                .map(Self::Level)
                .ok_or_else(|| ParseStateError(other.to_owned())),
        }
    }
}

/// What a caller asks an actuator to do.
///
/// The resulting state is computed by [`StateChange::apply`]:
/// - `Set` stores the given target as-is;
/// - `Toggle` flips `On`/`Off`, turns a never-actuated device `On`, and turns a
///   device holding a `Level` `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum StateChange {
    Set { state: ActuatorState },
    Toggle,
}

impl StateChange {
    /// Resolve the change against the currently stored state.
    #[must_use]
    pub fn apply(self, current: Option<ActuatorState>) -> ActuatorState {
        match self {
            Self::Set { state } => state,
            Self::Toggle => match current {
                None | Some(ActuatorState::Off) => ActuatorState::On,
                Some(ActuatorState::On | ActuatorState::Level(_)) => ActuatorState::Off,
            },
        }
    }
}

impl From<ActuatorState> for StateChange {
    fn from(state: ActuatorState) -> Self {
        Self::Set { state }
    }
}
