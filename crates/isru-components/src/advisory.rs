//! Non-fatal conditions raised during an hourly cycle.
//!
//! A shortfall never aborts a run: the subsystem clamps to what is available,
//! logs a warning and attaches one of these to its cycle outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Advisory {
    /// A reservoir could not supply what a subsystem asked for.
    Depleted { resource: String },
    /// A subsystem ran derated because the hour's power did not cover it.
    PowerShortfall {
        subsystem: String,
        available_kj: f64,
        needed_kj: f64,
    },
    /// Catalyst efficiency fell below the operating floor and was replaced.
    EfficiencyCollapse { efficiency: f64, restored_to: f64 },
}

impl Advisory {
    pub fn depleted(resource: impl Into<String>) -> Self {
        Advisory::Depleted {
            resource: resource.into(),
        }
    }

    pub fn power_shortfall(subsystem: impl Into<String>, available_kj: f64, needed_kj: f64) -> Self {
        Advisory::PowerShortfall {
            subsystem: subsystem.into(),
            available_kj,
            needed_kj,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Depleted { resource } => write!(f, "{resource} depleted"),
            Advisory::PowerShortfall {
                subsystem,
                available_kj,
                needed_kj,
            } => write!(
                f,
                "{subsystem} power shortfall ({available_kj:.1} kJ of {needed_kj:.1} kJ)"
            ),
            Advisory::EfficiencyCollapse {
                efficiency,
                restored_to,
            } => write!(
                f,
                "catalyst efficiency {efficiency:.3} below floor, replaced ({restored_to:.3})"
            ),
        }
    }
}
