//! Capability Model
//!
//! Maps a persona to its fixed capability set. Capabilities are always derived
//! from the persona and never mutated on their own.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role lens the current session operates under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Persona {
    #[default]
    CustomerAdmin,
    InternalOps,
    Engineer,
}

impl Persona {
    /// All personas in switcher order
    pub const ALL: [Persona; 3] = [Persona::CustomerAdmin, Persona::InternalOps, Persona::Engineer];

    /// Wire name, as stored in preferences
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::CustomerAdmin => "customerAdmin",
            Persona::InternalOps => "internalOps",
            Persona::Engineer => "engineer",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPersona { value: s.to_string() })
    }
}

/// An atomic permission flag gating a route, nav entry, or action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CanViewBusiness,
    CanViewOps,
    CanViewEng,
    CanViewLogs,
    CanPushFirmware,
    CanSendRemoteCommands,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::CanViewBusiness,
        Capability::CanViewOps,
        Capability::CanViewEng,
        Capability::CanViewLogs,
        Capability::CanPushFirmware,
        Capability::CanSendRemoteCommands,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CanViewBusiness => "can_view_business",
            Capability::CanViewOps => "can_view_ops",
            Capability::CanViewEng => "can_view_eng",
            Capability::CanViewLogs => "can_view_logs",
            Capability::CanPushFirmware => "can_push_firmware",
            Capability::CanSendRemoteCommands => "can_send_remote_commands",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size set of capabilities
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_slice(caps: &[Capability]) -> Self {
        caps.iter().fold(Self::empty(), |set, cap| set.with(*cap))
    }

    /// Return a copy with `cap` added
    pub fn with(self, cap: Capability) -> Self {
        Self(self.0 | cap.bit())
    }

    pub fn contains(&self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    /// ANY-of test used by the navigation filter
    pub fn intersects(&self, required: &[Capability]) -> bool {
        required.iter().any(|cap| self.contains(*cap))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Capability> + use<> {
        let set = *self;
        Capability::ALL.into_iter().filter(move |cap| set.contains(*cap))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.as_str())).finish()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, cap| set.with(cap))
    }
}

/// Capability set granted to a persona.
///
/// Customer admins and internal ops share the same set; only engineers see the
/// engineering surface.
pub fn capabilities_of(persona: Persona) -> CapabilitySet {
    match persona {
        Persona::CustomerAdmin | Persona::InternalOps => {
            CapabilitySet::from_slice(&[Capability::CanViewBusiness, Capability::CanViewOps])
        }
        Persona::Engineer => CapabilitySet::from_slice(&[
            Capability::CanViewEng,
            Capability::CanViewLogs,
            Capability::CanPushFirmware,
            Capability::CanSendRemoteCommands,
            Capability::CanViewBusiness,
            Capability::CanViewOps,
        ]),
    }
}

/// Set-membership test
pub fn has_capability(set: &CapabilitySet, capability: Capability) -> bool {
    set.contains(capability)
}
