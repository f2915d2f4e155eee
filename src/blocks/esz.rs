use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice, get_block_start};
use crate::error::Result;

//=====================================================================
// ESZ data block
//
// The union energy grid for the table, followed by four principal
// cross sections tabulated on it: total, disappearance, elastic, and
// average heating numbers, each num_energy_points long. Reactions
// keep pointers into the payload rather than copies, so this block
// resolves to column offsets.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ESZ {
    pub start: usize,
    pub num_energy_points: usize,
}

impl ESZ {
    pub fn energy_start(&self) -> usize {
        self.start
    }

    pub fn total_start(&self) -> usize {
        self.start + self.num_energy_points
    }

    pub fn disappearance_start(&self) -> usize {
        self.start + 2 * self.num_energy_points
    }

    pub fn elastic_start(&self) -> usize {
        self.start + 3 * self.num_energy_points
    }

    pub fn heating_start(&self) -> usize {
        self.start + 4 * self.num_energy_points
    }
}

impl<'a> PullFromXXS<'a> for ESZ {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        // Every table carries an ESZ block.
        let always_expected = true;

        let Some(block_start) = get_block_start(&BlockType::ESZ, arrays, always_expected)? else {
            return Ok(None);
        };

        // Five columns of num_energy_points values each.
        let block_length = 5 * arrays.nxs.nes;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for ESZ {
    type Dependencies = ();

    fn process(_data: &[f64], arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        // Presence was established by the pull stage.
        let start = arrays.jxs.get(&BlockType::ESZ) - 1;
        Ok(Self {
            start,
            num_energy_points: arrays.nxs.nes,
        })
    }
}

impl std::fmt::Display for ESZ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ESZ({} energies)", self.num_energy_points)
    }
}
