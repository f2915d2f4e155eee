use std::ops::Deref;

use crate::arrays::Arrays;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice, get_block_start};
use crate::blocks::{BlockType, MTR};
use crate::data::{Frame, Multiplicity};
use crate::error::Result;

//=====================================================================
// TYR data block
//
// One signed code per reaction channel describing neutron release and
// the reference frame for secondary emission. The magnitude encodes
// multiplicity (0 absorption, 1-4 fixed, 19 or >100 energy-dependent)
// and the sign encodes the frame (negative center-of-mass, positive
// laboratory).
//
// A code outside the defined set is suspicious data, not a fatal
// error. It is logged and read as energy-dependent, the convention
// the upstream processing codes use for every exotic case.
//=====================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionData {
    pub multiplicity: Multiplicity,
    pub frame: Frame,
}

impl TryFrom<i64> for EmissionData {
    type Error = i64;

    fn try_from(code: i64) -> std::result::Result<Self, i64> {
        Ok(Self {
            multiplicity: Multiplicity::try_from(code)?,
            frame: Frame::from(code),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TYR(pub Vec<EmissionData>);

impl Deref for TYR {
    type Target = Vec<EmissionData>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> PullFromXXS<'a> for TYR {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        let has_xs_other_than_elastic = arrays.nxs.ntr != 0;

        let Some(block_start) = get_block_start(&BlockType::TYR, arrays, has_xs_other_than_elastic)?
        else {
            return Ok(None);
        };

        let block_length = arrays.nxs.ntr;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for TYR {
    // MTR is only consulted for warning messages.
    type Dependencies = &'a Option<MTR>;

    fn process(data: &[f64], _arrays: &Arrays, mtr: &Option<MTR>) -> Result<Self> {
        let mtr = mtr.as_ref().unwrap();
        let emissions = data
            .iter()
            .enumerate()
            .map(|(i, &val)| {
                let code = val as i64;
                EmissionData::try_from(code).unwrap_or_else(|bad| {
                    log::warn!(
                        "MT {}: multiplicity code {} out of range, treating as energy-dependent",
                        mtr[i],
                        bad
                    );
                    EmissionData {
                        multiplicity: Multiplicity::EnergyDependent,
                        frame: Frame::from(code),
                    }
                })
            })
            .collect();

        Ok(Self(emissions))
    }
}

impl std::fmt::Display for TYR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TYR({} reactions)", self.len())
    }
}
