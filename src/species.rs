//! Particle/antiparticle pairs that can be selected for annihilation.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::particle::hex_color;

/// Joules per MeV.
pub const MEV_TO_JOULES: f64 = 1.602_176_634e-13;

/// A selectable matter/antimatter pair.
///
/// Selecting a species swaps color, size and rest-energy constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[default]
    Electron,
    Proton,
    Neutron,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Electron, Species::Proton, Species::Neutron];

    pub fn name(self) -> &'static str {
        match self {
            Species::Electron => "Electron",
            Species::Proton => "Proton",
            Species::Neutron => "Neutron",
        }
    }

    pub fn anti_name(self) -> &'static str {
        match self {
            Species::Electron => "Positron",
            Species::Proton => "Antiproton",
            Species::Neutron => "Antineutron",
        }
    }

    pub fn color(self) -> Vec4 {
        match self {
            Species::Electron => hex_color(0x1a2b47, 1.0),
            Species::Proton => hex_color(0x1e40af, 1.0),
            Species::Neutron => hex_color(0x374151, 1.0),
        }
    }

    pub fn anti_color(self) -> Vec4 {
        match self {
            Species::Electron => hex_color(0x722f37, 1.0),
            Species::Proton => hex_color(0x991b1b, 1.0),
            Species::Neutron => hex_color(0x4c1d95, 1.0),
        }
    }

    /// Draw radius of a seed particle, in pixels.
    pub fn size(self) -> f32 {
        match self {
            Species::Electron => 20.0,
            Species::Proton | Species::Neutron => 30.0,
        }
    }

    /// Rest energy of one particle, in MeV.
    pub fn rest_energy_mev(self) -> f64 {
        match self {
            Species::Electron => 0.511,
            Species::Proton => 938.27,
            Species::Neutron => 939.57,
        }
    }

    /// Energy released when one particle meets its antiparticle.
    pub fn annihilation_energy_mev(self) -> f64 {
        2.0 * self.rest_energy_mev()
    }

    /// The next species in selection order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Species::Electron => Species::Proton,
            Species::Proton => Species::Neutron,
            Species::Neutron => Species::Electron,
        }
    }
}
