// ── Power state model ──
//
// Server-reported states and client-only transients are distinct types;
// the only place they meet is the projection reducer, which produces
// DisplayPowerState. A transient never enters the DataStore.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── PowerState (server truth) ───────────────────────────────────────

/// A power state as vmrest reports it. Authoritative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PowerState {
    PoweredOn,
    PoweredOff,
    Paused,
    Suspended,
}

impl PowerState {
    /// Parse the daemon's wire string, `None` for anything unrecognized.
    pub fn from_wire(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

// ── TransientPowerState (client-only) ───────────────────────────────

/// A client-side transient shown while a power command is in flight.
/// Lives only inside an Override; never treated as server truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransientPowerState {
    PoweringOn,
    PoweringOff,
}

impl TransientPowerState {
    /// The terminal state this transient is heading toward. Once a poll
    /// reports it, the override has served its purpose.
    pub fn target(self) -> PowerState {
        match self {
            Self::PoweringOn => PowerState::PoweredOn,
            Self::PoweringOff => PowerState::PoweredOff,
        }
    }
}

// ── DisplayPowerState (projection output) ───────────────────────────

/// What consumers actually render: server truth unioned with the two
/// transients. Produced only by the projection reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayPowerState {
    PoweredOn,
    PoweredOff,
    Paused,
    Suspended,
    PoweringOn,
    PoweringOff,
}

impl DisplayPowerState {
    /// Human-readable label for tables and status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::PoweredOn => "On",
            Self::PoweredOff => "Off",
            Self::Paused => "Paused",
            Self::Suspended => "Suspended",
            Self::PoweringOn => "Powering On",
            Self::PoweringOff => "Powering Off",
        }
    }

    pub fn is_transient(self) -> bool {
        matches!(self, Self::PoweringOn | Self::PoweringOff)
    }
}

impl From<PowerState> for DisplayPowerState {
    fn from(s: PowerState) -> Self {
        match s {
            PowerState::PoweredOn => Self::PoweredOn,
            PowerState::PoweredOff => Self::PoweredOff,
            PowerState::Paused => Self::Paused,
            PowerState::Suspended => Self::Suspended,
        }
    }
}

impl From<TransientPowerState> for DisplayPowerState {
    fn from(s: TransientPowerState) -> Self {
        match s {
            TransientPowerState::PoweringOn => Self::PoweringOn,
            TransientPowerState::PoweringOff => Self::PoweringOff,
        }
    }
}

// ── PowerOperation ──────────────────────────────────────────────────

/// A power command accepted by `PUT /vms/{id}/power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PowerOperation {
    On,
    Off,
    Shutdown,
    Suspend,
    Pause,
    Unpause,
}

impl PowerOperation {
    /// The wire form the daemon expects as the PUT body.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Shutdown => "shutdown",
            Self::Suspend => "suspend",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
        }
    }

    /// The optimistic transient to show while this operation is in
    /// flight. Only hard power transitions get one; the others are
    /// observed through the next poll.
    pub fn transient(self) -> Option<TransientPowerState> {
        match self {
            Self::On => Some(TransientPowerState::PoweringOn),
            Self::Off => Some(TransientPowerState::PoweringOff),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn power_state_from_wire() {
        assert_eq!(PowerState::from_wire("poweredOn"), Some(PowerState::PoweredOn));
        assert_eq!(PowerState::from_wire("suspended"), Some(PowerState::Suspended));
        assert_eq!(PowerState::from_wire("warp"), None);
    }

    // Transients come only from the override path; the wire parser must
    // never admit them as server truth.
    #[test]
    fn transients_are_not_wire_states() {
        assert_eq!(PowerState::from_wire("poweringOn"), None);
        assert_eq!(PowerState::from_wire("poweringOff"), None);
    }

    #[test]
    fn transient_targets() {
        assert_eq!(
            TransientPowerState::PoweringOn.target(),
            PowerState::PoweredOn
        );
        assert_eq!(
            TransientPowerState::PoweringOff.target(),
            PowerState::PoweredOff
        );
    }

    #[test]
    fn operation_wire_form_and_transient() {
        assert_eq!(PowerOperation::On.as_wire(), "on");
        assert_eq!(PowerOperation::Shutdown.as_wire(), "shutdown");
        assert_eq!(
            PowerOperation::On.transient(),
            Some(TransientPowerState::PoweringOn)
        );
        assert_eq!(PowerOperation::Suspend.transient(), None);
    }

    #[test]
    fn operation_parses_from_cli_form() {
        let op: PowerOperation = "unpause".parse().unwrap();
        assert_eq!(op, PowerOperation::Unpause);
    }
}
