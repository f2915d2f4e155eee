use std::ops::RangeInclusive;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;

//=====================================================================
// Reaction-type (MT) codes, following the ENDF numbering convention.
// Only the codes the loader treats specially are enumerated; every
// other channel is carried by its raw integer code.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Display)]
#[repr(i32)]
pub enum MTNumber {
    Total = 1,
    ElasticScattering = 2,
    TotalInelastic = 4,
    N2n = 16,
    N3n = 17,
    Fission = 18,
    FirstChanceFission = 19,
    SecondChanceFission = 20,
    ThirdChanceFission = 21,
    FourthChanceFission = 38,
    Capture = 102,
    ProtonRemoval = 103,
    DeuteronRemoval = 104,
    TritonRemoval = 105,
    Helium3Removal = 106,
    AlphaRemoval = 107,
    PhotonProduction = 202,
    HeatProduction = 301,
}

/// The fission family: total fission plus the four chance-fission
/// partials.
pub fn is_fission_family(mt: i32) -> bool {
    matches!(mt, 18 | 19 | 20 | 21 | 38)
}

/// Discrete-level plus continuum inelastic scattering.
pub fn is_level_inelastic(mt: i32) -> bool {
    (51..=91).contains(&mt)
}

/// For an aggregate channel, the partial MT ranges that supersede it.
/// When any MT in one of these ranges is present on the same table,
/// the aggregate carries redundant physics and must not be sampled.
pub fn superseding_partials(mt: i32) -> Option<&'static [RangeInclusive<i32>]> {
    match mt {
        4 => Some(&[51..=91]),
        16 => Some(&[875..=891]),
        18 => Some(&[19..=21, 38..=38]),
        103 => Some(&[600..=649]),
        104 => Some(&[650..=699]),
        105 => Some(&[700..=749]),
        106 => Some(&[750..=799]),
        107 => Some(&[800..=849]),
        _ => None,
    }
}

//=====================================================================
// Charged-particle emission bookkeeping for the secondary-particle
// branching pass. A composite MT code implies a fixed set of emitted
// light particles; the residual nucleus is whatever is left of the
// target after the neutrons and charged particles leave.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SecondaryParticle {
    Proton,
    Deuteron,
    Triton,
    Helium3,
    Alpha,
}

impl SecondaryParticle {
    /// Atomic number and mass number of the emitted particle.
    pub fn za(self) -> (i32, i32) {
        match self {
            SecondaryParticle::Proton => (1, 1),
            SecondaryParticle::Deuteron => (1, 2),
            SecondaryParticle::Triton => (1, 3),
            SecondaryParticle::Helium3 => (2, 3),
            SecondaryParticle::Alpha => (2, 4),
        }
    }

    /// The single-particle-removal MT a branch for this particle is
    /// stored under.
    pub fn removal_mt(self) -> i32 {
        match self {
            SecondaryParticle::Proton => 103,
            SecondaryParticle::Deuteron => 104,
            SecondaryParticle::Triton => 105,
            SecondaryParticle::Helium3 => 106,
            SecondaryParticle::Alpha => 107,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargedEmission {
    /// Emitted particles with their per-reaction counts.
    pub particles: &'static [(SecondaryParticle, u32)],
    /// Neutrons leaving alongside them.
    pub neutrons: u32,
}

use SecondaryParticle::{Alpha, Deuteron, Helium3, Proton, Triton};

/// Emission table for the composite neutron-induced channels that
/// remove charged particles from the target.
pub fn charged_emission(mt: i32) -> Option<ChargedEmission> {
    let (particles, neutrons): (&'static [(SecondaryParticle, u32)], u32) = match mt {
        22 => (&[(Alpha, 1)], 1),    // (n,na)
        23 => (&[(Alpha, 3)], 1),    // (n,n3a)
        24 => (&[(Alpha, 1)], 2),    // (n,2na)
        25 => (&[(Alpha, 1)], 3),    // (n,3na)
        28 => (&[(Proton, 1)], 1),   // (n,np)
        29 => (&[(Alpha, 2)], 1),    // (n,n2a)
        30 => (&[(Alpha, 2)], 2),    // (n,2n2a)
        32 => (&[(Deuteron, 1)], 1), // (n,nd)
        33 => (&[(Triton, 1)], 1),   // (n,nt)
        34 => (&[(Helium3, 1)], 1),  // (n,nh)
        35 => (&[(Deuteron, 1), (Alpha, 2)], 1), // (n,nd2a)
        36 => (&[(Triton, 1), (Alpha, 2)], 1),   // (n,nt2a)
        41 => (&[(Proton, 1)], 2),   // (n,2np)
        42 => (&[(Proton, 1)], 3),   // (n,3np)
        44 => (&[(Proton, 2)], 1),   // (n,n2p)
        45 => (&[(Proton, 1), (Alpha, 1)], 1), // (n,npa)
        103 => (&[(Proton, 1)], 0),
        104 => (&[(Deuteron, 1)], 0),
        105 => (&[(Triton, 1)], 0),
        106 => (&[(Helium3, 1)], 0),
        107 => (&[(Alpha, 1)], 0),
        _ => return None,
    };
    Some(ChargedEmission { particles, neutrons })
}

/// Short human-readable name for a reaction code, for log and display
/// purposes only.
pub fn reaction_name(mt: i32) -> String {
    match mt {
        1 => "total".to_string(),
        2 => "elastic scattering".to_string(),
        4 => "total inelastic".to_string(),
        16 => "(n,2n)".to_string(),
        17 => "(n,3n)".to_string(),
        18 => "fission".to_string(),
        19 => "first-chance fission".to_string(),
        20 => "second-chance fission".to_string(),
        21 => "third-chance fission".to_string(),
        22 => "(n,na)".to_string(),
        28 => "(n,np)".to_string(),
        38 => "fourth-chance fission".to_string(),
        102 => "(n,g)".to_string(),
        103 => "(n,p)".to_string(),
        104 => "(n,d)".to_string(),
        105 => "(n,t)".to_string(),
        106 => "(n,h)".to_string(),
        107 => "(n,a)".to_string(),
        202 => "photon production".to_string(),
        301 => "heat production".to_string(),
        n if (51..=90).contains(&n) => format!("inelastic level {}", n - 50),
        91 => "inelastic continuum".to_string(),
        n => format!("MT {}", n),
    }
}
