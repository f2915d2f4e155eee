use std::ops::Deref;

use crate::arrays::Arrays;
use crate::blocks::block_traits::{
    PullFromXXS, Process, block_range_to_slice, get_block_start, integer_at,
};
use crate::blocks::{BlockType, LSIG};
use crate::error::{GraceError, Result};

//=====================================================================
// SIG data block
//
// Per-channel cross section entries. Each entry is laid out as
// [grid_start, num_points, xs values...], where grid_start is the
// one-based index on the union energy grid of the first tabulated
// point. Entries are resolved into absolute payload locators so that
// reactions can point straight into the XXS array.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XsLocator {
    /// Zero-based index on the union energy grid of the first point.
    pub grid_index: usize,
    /// Number of tabulated cross section points.
    pub num_points: usize,
    /// Absolute payload index of the first cross section value.
    pub xs_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SIG(pub Vec<XsLocator>);

impl Deref for SIG {
    type Target = Vec<XsLocator>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> PullFromXXS<'a> for SIG {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        let has_xs_other_than_elastic = arrays.nxs.ntr != 0;

        let Some(block_start) = get_block_start(&BlockType::SIG, arrays, has_xs_other_than_elastic)?
        else {
            return Ok(None);
        };

        // Walk the entries to find the extent of the block. Each entry
        // declares its own point count in its second slot.
        let mut block_length = 0;
        for _ in 0..arrays.nxs.ntr {
            let num_points = integer_at(arrays, block_start + block_length + 1)?;
            if num_points < 1 {
                return Err(GraceError::format(format!(
                    "cross section entry declares {} points",
                    num_points
                )));
            }
            block_length += num_points as usize + 2;
        }

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for SIG {
    type Dependencies = &'a Option<LSIG>;

    fn process(data: &[f64], arrays: &Arrays, lsig: &Option<LSIG>) -> Result<Self> {
        let lsig = lsig.as_ref().unwrap();
        let block_start = arrays.jxs.get(&BlockType::SIG) - 1;
        let num_energy_points = arrays.nxs.nes;

        let mut locators = Vec::with_capacity(lsig.len());
        for &loc in lsig.iter() {
            let entry = loc - 1;
            if entry + 2 > data.len() {
                return Err(GraceError::format(format!(
                    "cross section locator {} points past the SIG block",
                    loc
                )));
            }
            let grid_start = data[entry] as usize;
            let num_points = data[entry + 1] as usize;
            if grid_start < 1 || grid_start - 1 + num_points > num_energy_points {
                return Err(GraceError::format(format!(
                    "cross section grid segment [{}; {} points] leaves the {}-point union grid",
                    grid_start, num_points, num_energy_points
                )));
            }
            if entry + 2 + num_points > data.len() {
                return Err(GraceError::format(
                    "cross section values run past the SIG block",
                ));
            }
            locators.push(XsLocator {
                grid_index: grid_start - 1,
                num_points,
                xs_index: block_start + entry + 2,
            });
        }

        Ok(Self(locators))
    }
}

impl std::fmt::Display for SIG {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SIG({} xs)", self.len())
    }
}
