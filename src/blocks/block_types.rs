use strum_macros::{Display, EnumIter};

//=====================================================================
// Every logical sub-table a continuous-energy neutron table can carry.
// The jump table stores one payload offset per block type; a zero
// offset means the table does not carry that block.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum BlockType {
    ESZ,   // Union energy grid and principal cross sections
    NU,    // Fission nu data
    MTR,   // MT codes, one per reaction channel
    LQR,   // Q-values, one per reaction channel
    TYR,   // Multiplicity and reference-frame codes
    LSIG,  // Cross section locators
    SIG,   // Cross section data
    LAND,  // Angular distribution locators
    AND,   // Angular distribution data
    LDLW,  // Energy distribution locators
    DLW,   // Energy distribution data
    GPD,   // Total photon production cross section
    MTRP,  // Photon production MT codes
    LSIGP, // Photon production cross section locators
    SIGP,  // Photon production cross section data
    LANDP, // Photon production angular distribution locators
    ANDP,  // Photon production angular distribution data
    LDLWP, // Photon production energy distribution locators
    DLWP,  // Photon production energy distribution data
    YP,    // Yield multiplier table
    FIS,   // Total fission cross section
    END,   // Last word of the conventional table
    LUND,  // Probability tables
    DNU,   // Delayed nu-bar data
    BDD,   // Delayed neutron precursor data
    DNEDL, // Delayed neutron energy distribution locators
    DNED,  // Delayed neutron energy distributions
    PTYPE, // Secondary particle types
    NTRO,  // Secondary particle production reaction counts
    NEXT,  // Secondary particle production locators
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", BlockType::ESZ), "ESZ");
        assert_eq!(format!("{}", BlockType::LSIG), "LSIG");
        assert_eq!(format!("{}", BlockType::GPD), "GPD");
        assert_eq!(format!("{}", BlockType::NEXT), "NEXT");
    }

    #[test]
    fn test_equality() {
        assert_eq!(BlockType::ESZ, BlockType::ESZ);
        assert_ne!(BlockType::ESZ, BlockType::NU);
    }

    #[test]
    fn test_iter_is_complete_and_distinct() {
        let all: Vec<BlockType> = BlockType::iter().collect();
        assert_eq!(all.len(), 30);
        let unique: HashSet<String> = all.iter().map(|b| format!("{}", b)).collect();
        assert_eq!(unique.len(), 30);
    }
}
