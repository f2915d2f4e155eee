use std::ops::Deref;

use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice, get_block_start};
use crate::error::Result;

//=====================================================================
// LQR data block
//
// One Q-value per reaction channel, in MTR channel order.
//=====================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LQR(pub Vec<f64>);

impl Deref for LQR {
    type Target = Vec<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> PullFromXXS<'a> for LQR {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        let has_xs_other_than_elastic = arrays.nxs.ntr != 0;

        let Some(block_start) = get_block_start(&BlockType::LQR, arrays, has_xs_other_than_elastic)?
        else {
            return Ok(None);
        };

        let block_length = arrays.nxs.ntr;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for LQR {
    type Dependencies = ();

    fn process(data: &[f64], _arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        Ok(Self(data.to_vec()))
    }
}

impl std::fmt::Display for LQR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LQR({} reactions)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::{JxsArray, NxsArray};
    use crate::blocks::block_traits::Parse;
    use strum::IntoEnumIterator;

    #[test]
    fn test_lqr_parsing() {
        let xxs = vec![0.0, -4.8, 6.5444];
        let nxs = NxsArray {
            xxs_len: xxs.len(),
            za: 26056,
            nes: 0,
            ntr: 3,
            nr: 0,
            ntrp: 0,
            ntype: 0,
            npcr: 0,
            s: 0,
            z: 26,
            a: 56,
        };
        let mut jxs = JxsArray::default();
        for block_type in BlockType::iter() {
            jxs.insert(block_type, 0);
        }
        jxs.insert(BlockType::LQR, 1);
        let arrays = Arrays {
            nxs: &nxs,
            jxs: &jxs,
            xxs: &xxs,
        };

        let lqr = LQR::parse(&arrays, ()).unwrap().unwrap();
        assert_eq!(*lqr, vec![0.0, -4.8, 6.5444]);
    }
}
