use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice};
use crate::error::Result;

//=====================================================================
// GPD data block
//
// Total photon production cross section, tabulated over the full
// union energy grid. Optional; its presence is signaled purely by a
// non-zero jump table entry.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GPD {
    pub start: usize,
    pub num_energy_points: usize,
}

impl<'a> PullFromXXS<'a> for GPD {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        // No descriptor entry constrains GPD, so a zero jump entry
        // just means the table has no photon production data.
        let start_index = arrays.jxs.get(&BlockType::GPD);
        if start_index == 0 {
            return Ok(None);
        }

        let block_start = start_index - 1;
        let block_length = arrays.nxs.nes;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for GPD {
    type Dependencies = ();

    fn process(_data: &[f64], arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        Ok(Self {
            start: arrays.jxs.get(&BlockType::GPD) - 1,
            num_energy_points: arrays.nxs.nes,
        })
    }
}

impl std::fmt::Display for GPD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GPD({} energies)", self.num_energy_points)
    }
}
