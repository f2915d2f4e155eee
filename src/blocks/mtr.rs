use std::ops::Deref;

use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice, get_block_start};
use crate::error::Result;

//=====================================================================
// MTR data block
//
// One MT code per reaction channel, in the order channels appear in
// every other per-channel block. That order is load-bearing: the
// reaction list mirrors it, so this block stays a Vec rather than a
// map.
//=====================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MTR(pub Vec<i32>);

impl Deref for MTR {
    type Target = Vec<i32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> PullFromXXS<'a> for MTR {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        // MTR is present exactly when the table has channels beyond
        // elastic scattering.
        let has_xs_other_than_elastic = arrays.nxs.ntr != 0;

        let Some(block_start) = get_block_start(&BlockType::MTR, arrays, has_xs_other_than_elastic)?
        else {
            return Ok(None);
        };

        let block_length = arrays.nxs.ntr;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for MTR {
    type Dependencies = ();

    fn process(data: &[f64], _arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        Ok(Self(data.iter().map(|&val| val as i32).collect()))
    }
}

impl std::fmt::Display for MTR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MTR({} reactions)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::{JxsArray, NxsArray};
    use crate::blocks::block_traits::Parse;
    use strum::IntoEnumIterator;

    fn arrays_with_mtr(xxs_len: usize, ntr: usize, mtr_start: usize) -> (NxsArray, JxsArray) {
        let nxs = NxsArray {
            xxs_len,
            za: 26056,
            nes: 0,
            ntr,
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
        jxs.insert(BlockType::MTR, mtr_start);
        (nxs, jxs)
    }

    #[test]
    fn test_mtr_parsing_preserves_channel_order() {
        let xxs = vec![16.0, 102.0, 51.0, 18.0];
        let (nxs, jxs) = arrays_with_mtr(xxs.len(), 4, 1);
        let arrays = Arrays {
            nxs: &nxs,
            jxs: &jxs,
            xxs: &xxs,
        };

        let mtr = MTR::parse(&arrays, ()).unwrap().unwrap();
        assert_eq!(*mtr, vec![16, 102, 51, 18]);
    }

    #[test]
    fn test_mtr_absent_for_elastic_only_table() {
        let xxs = vec![0.0];
        let (nxs, jxs) = arrays_with_mtr(xxs.len(), 0, 0);
        let arrays = Arrays {
            nxs: &nxs,
            jxs: &jxs,
            xxs: &xxs,
        };

        assert!(MTR::parse(&arrays, ()).unwrap().is_none());
    }

    #[test]
    fn test_mtr_overrunning_payload_is_fatal() {
        let xxs = vec![16.0, 102.0];
        let (nxs, jxs) = arrays_with_mtr(xxs.len(), 4, 1);
        let arrays = Arrays {
            nxs: &nxs,
            jxs: &jxs,
            xxs: &xxs,
        };

        assert!(MTR::parse(&arrays, ()).is_err());
    }
}
