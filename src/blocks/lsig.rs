use std::ops::Deref;

use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::blocks::block_traits::{PullFromXXS, Process, block_range_to_slice, get_block_start};
use crate::error::{GraceError, Result};

//=====================================================================
// LSIG data block
//
// One locator per reaction channel giving the one-based position of
// that channel's cross section entry relative to the start of the SIG
// block.
//=====================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LSIG(pub Vec<usize>);

impl Deref for LSIG {
    type Target = Vec<usize>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> PullFromXXS<'a> for LSIG {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        let has_xs_other_than_elastic = arrays.nxs.ntr != 0;

        let Some(block_start) =
            get_block_start(&BlockType::LSIG, arrays, has_xs_other_than_elastic)?
        else {
            return Ok(None);
        };

        let block_length = arrays.nxs.ntr;

        Ok(Some(block_range_to_slice(block_start, block_length, arrays)?))
    }
}

impl<'a> Process<'a> for LSIG {
    type Dependencies = ();

    fn process(data: &[f64], _arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        let locators = data
            .iter()
            .map(|&val| {
                let loc = val as i64;
                if loc < 1 {
                    return Err(GraceError::format(format!(
                        "cross section locator {} is not positive",
                        loc
                    )));
                }
                Ok(loc as usize)
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(Self(locators))
    }
}

impl std::fmt::Display for LSIG {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LSIG({} xs)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::{JxsArray, NxsArray};
    use crate::blocks::block_traits::Parse;
    use strum::IntoEnumIterator;

    fn arrays_for(xxs_len: usize, ntr: usize) -> (NxsArray, JxsArray) {
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
        jxs.insert(BlockType::LSIG, 1);
        (nxs, jxs)
    }

    #[test]
    fn test_lsig_parsing() {
        let xxs = vec![1.0, 6.0, 11.0];
        let (nxs, jxs) = arrays_for(xxs.len(), 3);
        let arrays = Arrays {
            nxs: &nxs,
            jxs: &jxs,
            xxs: &xxs,
        };

        let lsig = LSIG::parse(&arrays, ()).unwrap().unwrap();
        assert_eq!(*lsig, vec![1, 6, 11]);
    }

    #[test]
    fn test_nonpositive_locator_is_fatal() {
        let xxs = vec![1.0, 0.0];
        let (nxs, jxs) = arrays_for(xxs.len(), 2);
        let arrays = Arrays {
            nxs: &nxs,
            jxs: &jxs,
            xxs: &xxs,
        };

        assert!(LSIG::parse(&arrays, ()).is_err());
    }
}
