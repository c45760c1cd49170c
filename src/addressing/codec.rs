//! Switch identity encoding.
//!
//! A switch identity occupies the low 24 bits of a `u32`, laid out as
//! `0xZZYYXX`. For a pod-local switch the low byte `XX` is the fixed marker
//! `0x01`, `YY` carries the tier-coded index (aggregation switches add
//! `k/2`), and `ZZ` is the pod. For a core switch `ZZ` is `k` itself, `YY`
//! the grid row, and `XX` the grid column. Pods never reach `k`, so the two
//! forms cannot collide.

use serde::{Deserialize, Serialize};

use crate::error::FabricError;
use crate::fabric::Fabric;

/// Low byte of every pod-local (edge or aggregation) switch identity.
pub const POD_SWITCH_MARKER: u8 = 0x01;

/// Forwarding tier a switch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchRole {
    Core,
    Agg,
    Edge,
}

impl std::fmt::Display for SwitchRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchRole::Core => write!(f, "core"),
            SwitchRole::Agg => write!(f, "agg"),
            SwitchRole::Edge => write!(f, "edge"),
        }
    }
}

/// Semantic position of a switch in the fat tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchPosition {
    /// Core grid switch at `(row, col)`, both in `[0, k/2)`.
    Core { row: u8, col: u8 },
    /// Aggregation switch `index` of pod `pod`, `index` in `[0, k/2)`.
    Agg { pod: u8, index: u8 },
    /// Edge switch `index` of pod `pod`, `index` in `[0, k/2)`.
    Edge { pod: u8, index: u8 },
}

impl SwitchPosition {
    pub fn role(&self) -> SwitchRole {
        match self {
            SwitchPosition::Core { .. } => SwitchRole::Core,
            SwitchPosition::Agg { .. } => SwitchRole::Agg,
            SwitchPosition::Edge { .. } => SwitchRole::Edge,
        }
    }

    /// Display name used in topology descriptors and logs.
    pub fn name(&self) -> String {
        match self {
            SwitchPosition::Core { row, col } => format!("core_{}_{}", row, col),
            SwitchPosition::Agg { pod, index } => format!("agg_{}_{}", pod, index),
            SwitchPosition::Edge { pod, index } => format!("edge_{}_{}", pod, index),
        }
    }
}

impl std::fmt::Display for SwitchPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub(crate) fn check_range(what: &'static str, value: u8, limit: u8) -> Result<(), FabricError> {
    if value < limit {
        Ok(())
    } else {
        Err(FabricError::OutOfRange {
            what,
            value: value as u32,
            limit: limit as u32,
        })
    }
}

/// Decode a numeric switch identity into its semantic position.
///
/// Any identity outside the valid image for this fabric is an error; an
/// unknown byte pattern is never silently classified into a nearby role.
pub fn decode(id: u32, fabric: Fabric) -> Result<SwitchPosition, FabricError> {
    let unrecognized = FabricError::UnrecognizedIdentity { id, k: fabric.k() };
    if id > 0x00ff_ffff {
        return Err(unrecognized);
    }
    let x = (id & 0xff) as u8;
    let y = ((id >> 8) & 0xff) as u8;
    let z = ((id >> 16) & 0xff) as u8;
    let half = fabric.half();

    if z == fabric.k() {
        if y < half && x < half {
            Ok(SwitchPosition::Core { row: y, col: x })
        } else {
            Err(unrecognized)
        }
    } else if z < fabric.k() && x == POD_SWITCH_MARKER {
        if y < half {
            Ok(SwitchPosition::Edge { pod: z, index: y })
        } else if y < fabric.k() {
            Ok(SwitchPosition::Agg {
                pod: z,
                index: y - half,
            })
        } else {
            Err(unrecognized)
        }
    } else {
        Err(unrecognized)
    }
}

/// Encode a semantic position into its numeric switch identity.
///
/// Inverse of [`decode`]: `decode(encode(p)?) == p` for every position whose
/// coordinates are in range. Out-of-range coordinates are rejected.
pub fn encode(position: SwitchPosition, fabric: Fabric) -> Result<u32, FabricError> {
    let half = fabric.half();
    let (z, y, x) = match position {
        SwitchPosition::Core { row, col } => {
            check_range("core row", row, half)?;
            check_range("core col", col, half)?;
            (fabric.k(), row, col)
        }
        SwitchPosition::Agg { pod, index } => {
            check_range("pod", pod, fabric.k())?;
            check_range("aggregation index", index, half)?;
            (pod, index + half, POD_SWITCH_MARKER)
        }
        SwitchPosition::Edge { pod, index } => {
            check_range("pod", pod, fabric.k())?;
            check_range("edge index", index, half)?;
            (pod, index, POD_SWITCH_MARKER)
        }
    };
    Ok(((z as u32) << 16) | ((y as u32) << 8) | x as u32)
}
