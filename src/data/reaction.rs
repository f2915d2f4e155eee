use strum_macros::Display;

use crate::arena::{Handle, Linked};
use crate::data::branch_list::BranchRatio;
use crate::data::fission_yield::FissionYield;
use crate::data::mt::reaction_name;

//=====================================================================
// Reaction channel record.
//
// One fixed-layout record per channel, arena-resident and chained per
// nuclide through the intrusive links. The branching passes extend the
// chain with duplicates; the original stays the representative of its
// MT and every duplicate points back at it through `parent`.
//=====================================================================

/// How a record participates in sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ReactionKind {
    /// A normal sampled primary channel.
    Partial,
    /// Informational only (heat, photon production, retagged
    /// aggregates, the total-fission pseudo-reaction). Never sampled.
    Special,
    /// A branch duplicate produced while following the incident
    /// particle (isomeric split, own-MT particle removal, yield split).
    TransportBranch,
    /// A branch duplicate produced by a chained secondary-emission
    /// code rather than the reaction's own MT.
    DecayBranch,
}

/// Neutron release per reaction, decoded from the magnitude of the
/// combined multiplicity/frame code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// No secondary neutrons.
    Absorption,
    /// A constant number of secondary neutrons (1 through 4).
    Fixed(u32),
    /// Multiplicity tabulated against incident energy elsewhere in the
    /// table (fission, or a code above 100).
    EnergyDependent,
}

impl TryFrom<i64> for Multiplicity {
    type Error = i64;

    /// Fails with the original code when the magnitude is outside the
    /// defined vocabulary.
    fn try_from(code: i64) -> std::result::Result<Self, i64> {
        match code.unsigned_abs() {
            0 => Ok(Multiplicity::Absorption),
            n @ 1..=4 => Ok(Multiplicity::Fixed(n as u32)),
            19 => Ok(Multiplicity::EnergyDependent),
            n if n > 100 => Ok(Multiplicity::EnergyDependent),
            _ => Err(code),
        }
    }
}

/// Reference frame for secondary emission, decoded from the sign of
/// the combined multiplicity/frame code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Frame {
    Laboratory,
    CenterOfMass,
}

impl From<i64> for Frame {
    fn from(code: i64) -> Self {
        if code < 0 {
            Frame::CenterOfMass
        } else {
            Frame::Laboratory
        }
    }
}

/// Where a channel's cross section lives inside the nuclide payload.
///
/// `grid_index` positions the channel's threshold on the union energy
/// grid; the channel has values for grid points `grid_index ..
/// grid_index + num_points` only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XsSlice {
    pub grid_index: usize,
    pub num_points: usize,
    /// Offset of the first cross-section value within the payload.
    pub xs_index: usize,
    pub e_min: f64,
    pub e_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub mt: i32,
    pub kind: ReactionKind,
    /// Reaction Q-value in MeV.
    pub q_value: f64,
    /// 0 on the representative member of an isomeric pair, non-zero on
    /// every duplicate.
    pub final_state: u8,
    pub parent: Option<Handle<Reaction>>,
    pub multiplicity: Multiplicity,
    pub frame: Frame,
    /// Absent on synthetic records that carry no cross section of
    /// their own.
    pub xs: Option<XsSlice>,
    /// Payload offset of the channel's angular-distribution entry,
    /// when it has a stored table.
    pub angular_index: Option<usize>,
    /// Isomeric branching data, attached to representatives only.
    pub branch_ratio: Option<BranchRatio>,
    /// Chained secondary-emission codes stamped by the decay-data
    /// collaborator. 0 marks an unused slot.
    pub secondary_modes: [i32; 5],
    /// Residual nuclide ZAI for particle-removal branches, 0 otherwise.
    pub recoil_zai: i32,
    /// Branching-fraction multiplier for particle-removal branches.
    pub branch_multiplier: f64,
    pub yield_ref: Option<Handle<FissionYield>>,
    /// Interpolation boundaries around the attached yield entry.
    pub yield_e: [f64; 3],
    /// One-group transmutation accumulator slot.
    pub transmute_slot: Option<u32>,
    next: Option<Handle<Reaction>>,
    prev: Option<Handle<Reaction>>,
}

impl Reaction {
    pub fn new(mt: i32, kind: ReactionKind, q_value: f64) -> Self {
        Reaction {
            mt,
            kind,
            q_value,
            final_state: 0,
            parent: None,
            multiplicity: Multiplicity::Absorption,
            frame: Frame::Laboratory,
            xs: None,
            angular_index: None,
            branch_ratio: None,
            secondary_modes: [0; 5],
            recoil_zai: 0,
            branch_multiplier: 1.0,
            yield_ref: None,
            yield_e: [0.0; 3],
            transmute_slot: None,
            next: None,
            prev: None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(
            self.kind,
            ReactionKind::TransportBranch | ReactionKind::DecayBranch
        )
    }
}

impl Linked for Reaction {
    fn next(&self) -> Option<Handle<Reaction>> {
        self.next
    }
    fn prev(&self) -> Option<Handle<Reaction>> {
        self.prev
    }
    fn set_next(&mut self, next: Option<Handle<Reaction>>) {
        self.next = next;
    }
    fn set_prev(&mut self, prev: Option<Handle<Reaction>>) {
        self.prev = prev;
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reaction(MT {}, {}, {}, Q {} MeV)",
            self.mt,
            reaction_name(self.mt),
            self.kind,
            self.q_value
        )
    }
}
