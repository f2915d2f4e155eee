use strum_macros::Display;

use crate::arena::Handle;
use crate::data::reaction::{Reaction, XsSlice};
use crate::error::{GraceError, Result};

//=====================================================================
// Loaded nuclide.
//
// Owns the payload image its reactions point into and the head of the
// reaction chain. The stage field makes the loading pipeline explicit:
// every pass gates on its predecessor and advancing past Immutable is
// impossible, so a finished nuclide can only be read.
//=====================================================================

/// What a table is for, read off the identifier suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NuclideKind {
    /// Continuous-energy neutron transport data.
    Transport,
    /// Decay data only, no transport channels.
    DecayOnly,
    /// Dosimetry response functions.
    Dosimetry,
    /// Thermal scattering law data.
    ThermalScattering,
    /// Photoatomic data.
    Photon,
    /// A 0 K transport table kept as the reference for on-the-fly
    /// Doppler broadening.
    DopplerReference,
}

impl NuclideKind {
    pub fn from_table_name(name: &str, kT: f64) -> NuclideKind {
        let kind = match name.chars().last() {
            Some('y') => NuclideKind::Dosimetry,
            Some('t') => NuclideKind::ThermalScattering,
            Some('p') => NuclideKind::Photon,
            Some('d') => NuclideKind::DecayOnly,
            _ => NuclideKind::Transport,
        };
        if kind == NuclideKind::Transport && kT == 0.0 {
            NuclideKind::DopplerReference
        } else {
            kind
        }
    }
}

/// Loading pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum LoadStage {
    Unloaded,
    Decoded,
    IsomerBranched,
    SecondaryBranched,
    YieldBranched,
    Validated,
    Immutable,
}

#[derive(Debug, Clone)]
pub struct Nuclide {
    /// Identifier the table was located under in the library.
    pub name: String,
    /// Modern identifier from a versioned header, when present.
    pub alias: Option<String>,
    /// 10 * ZA + isomeric state.
    pub zai: i32,
    /// Target mass in neutron masses.
    pub atomic_weight_ratio: f64,
    /// Processing temperature in MeV.
    pub kT: f64,
    /// Processing temperature in Kelvin.
    pub temperature: f64,
    pub kind: NuclideKind,
    pub fissile: bool,
    pub has_branch_data: bool,
    pub doppler_broadened: bool,
    /// The table payload; every reaction slice indexes into this.
    pub payload: Vec<f64>,
    /// Head of the reaction chain.
    pub reactions: Option<Handle<Reaction>>,
    /// Transmutation accumulator slots handed out so far.
    pub transmute_slots: u32,
    pub stage: LoadStage,
    /// Payload offset of the union energy grid.
    pub energy_start: usize,
    pub num_energy_points: usize,
}

impl Nuclide {
    pub fn z(&self) -> i32 {
        split_zai(self.zai).0
    }

    pub fn a(&self) -> i32 {
        split_zai(self.zai).1
    }

    pub fn isomeric_state(&self) -> i32 {
        split_zai(self.zai).2
    }

    /// The union energy grid every channel's slice is threaded on.
    pub fn energy_grid(&self) -> &[f64] {
        &self.payload[self.energy_start..self.energy_start + self.num_energy_points]
    }

    /// Cross-section values of one channel, aligned with
    /// `energy_grid()[slice.grid_index..]`.
    pub fn xs_values<'a>(&'a self, slice: &XsSlice) -> &'a [f64] {
        &self.payload[slice.xs_index..slice.xs_index + slice.num_points]
    }

    /// Linear interpolation on the channel's portion of the union
    /// grid, clamped at both ends.
    pub fn xs_at(&self, slice: &XsSlice, energy: f64) -> f64 {
        let grid = &self.energy_grid()[slice.grid_index..slice.grid_index + slice.num_points];
        let values = self.xs_values(slice);
        let n = grid.len();

        if energy <= grid[0] {
            return values[0];
        }
        if energy >= grid[n - 1] {
            return values[n - 1];
        }

        match grid.binary_search_by(|e| e.partial_cmp(&energy).unwrap()) {
            Ok(idx) => values[idx],
            Err(idx) => {
                let t = (energy - grid[idx - 1]) / (grid[idx] - grid[idx - 1]);
                values[idx - 1] + t * (values[idx] - values[idx - 1])
            }
        }
    }

    /// Gate for the loading pipeline. `Ok(true)` means the caller owns
    /// this stage and must run; `Ok(false)` means the stage was already
    /// passed and the call is a no-op. Arriving below the required
    /// stage is a pipeline bug.
    pub fn check_stage(&self, required: LoadStage) -> Result<bool> {
        if self.stage == required {
            Ok(true)
        } else if self.stage > required {
            Ok(false)
        } else {
            Err(GraceError::invariant(format!(
                "{}: loading stage is {} but {} is required",
                self.name, self.stage, required
            )))
        }
    }
}

impl std::fmt::Display for Nuclide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Nuclide({}, ZAI {}, {} K, {})",
            self.name, self.zai, self.temperature, self.kind
        )
    }
}

/// Combine a ZA identifier and an isomeric state into a ZAI.
pub fn zai_from_za(za: i32, state: i32) -> i32 {
    10 * za + state
}

/// Split a ZAI into (Z, A, isomeric state).
pub fn split_zai(zai: i32) -> (i32, i32, i32) {
    let za = zai / 10;
    (za / 1000, za % 1000, zai % 10)
}
