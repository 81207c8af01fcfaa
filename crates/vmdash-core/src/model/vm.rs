// ── Core identity types ──
//
// VmId is the foundation of every per-VM map in the engine: cache keys,
// override keys, and fan-out task keys are all VmIds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use vmdash_api::types::{VmInformation, VmSummary};

// ── VmId ────────────────────────────────────────────────────────────

/// Opaque vmrest VM identifier.
///
/// Stable and unique within a poll snapshot; the daemon mints them, the
/// engine only carries them around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmId(String);

impl VmId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VmId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for VmId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── Vm ──────────────────────────────────────────────────────────────

/// One virtual machine as the daemon lists it: identity plus the
/// filesystem path of its .vmx file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub id: VmId,
    pub path: String,
}

impl Vm {
    /// Display name: the last segment of the path.
    pub fn name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .find(|seg| !seg.is_empty())
            .unwrap_or(&self.path)
    }
}

impl From<VmSummary> for Vm {
    fn from(raw: VmSummary) -> Self {
        Self {
            id: VmId::new(raw.id),
            path: raw.path,
        }
    }
}

// ── VmDetail ────────────────────────────────────────────────────────

/// CPU/memory settings, fetched per VM each poll cycle. Either field may
/// be absent when the daemon withholds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmDetail {
    pub processors: Option<u32>,
    pub memory_mb: Option<u64>,
}

impl From<VmInformation> for VmDetail {
    fn from(raw: VmInformation) -> Self {
        Self {
            processors: raw.cpu.map(vmdash_api::types::CpuInfo::processors),
            memory_mb: raw.memory.map(vmdash_api::types::MemoryInfo::megabytes),
        }
    }
}
