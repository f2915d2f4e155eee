use std::ops::Deref;

use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice, get_block_start};
use crate::error::Result;

//=====================================================================
// LAND data block
//
// Angular distribution locators. Slot 0 is elastic scattering, then
// one slot for each of the first num_secondary_channels channels in
// MTR order (the channels that produce secondary neutrons). Locator
// values are one-based offsets into the AND block when positive, 0
// when the distribution is isotropic at all energies, and negative
// when the distribution is supplied through a different block.
//=====================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LAND(pub Vec<i64>);

impl Deref for LAND {
    type Target = Vec<i64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl LAND {
    pub fn elastic(&self) -> i64 {
        self.0[0]
    }

    /// Locator for the channel at `index` in MTR order, if it is one
    /// of the secondary-neutron channels covered by this block.
    pub fn channel(&self, index: usize) -> Option<i64> {
        self.0.get(index + 1).copied()
    }
}

impl<'a> PullFromXXS<'a> for LAND {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        // Elastic scattering always has angular data, so the block is
        // always present.
        let always_expected = true;

        let Some(block_start) = get_block_start(&BlockType::LAND, arrays, always_expected)? else {
            return Ok(None);
        };

        let block_length = arrays.nxs.nr + 1;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for LAND {
    type Dependencies = ();

    fn process(data: &[f64], _arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        Ok(Self(data.iter().map(|&val| val as i64).collect()))
    }
}

impl std::fmt::Display for LAND {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LAND({} locators)", self.len())
    }
}
