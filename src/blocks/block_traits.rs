use crate::arrays::Arrays;
use crate::blocks::BlockType;
use crate::error::{GraceError, Result};

//=====================================================================
// Every block in the XXS array implements the following traits:
// - PullFromXXS:
//     - Pull the block's raw data from the XXS array. This holds all
//       of the logic needed to determine the extent of the block, and
//       returns a slice of the XXS array. Ok(None) means the block is
//       legitimately absent from this table.
// - Process:
//     - Convert the slice produced by PullFromXXS into the block's
//       final data structure. Blocks that depend on values from other
//       blocks receive them through the Dependencies associated type.
//
// When both are implemented, the Parse trait is provided for free and
// runs the two stages in order.
//
// Unlike an in-memory structure, the payload comes straight from an
// untrusted file, so every stage returns a Result and a block that
// runs off the end of the payload is a format error rather than a
// panic.
//=====================================================================

pub trait PullFromXXS<'a> {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>>
    where
        Self: Sized;
}

pub trait Process<'a> {
    type Dependencies;

    fn process(data: &'a [f64], arrays: &Arrays, dependencies: Self::Dependencies) -> Result<Self>
    where
        Self: Sized;
}

pub trait Parse<'a>: PullFromXXS<'a> + Process<'a> {
    fn parse(arrays: &'a Arrays, dependencies: Self::Dependencies) -> Result<Option<Self>>
    where
        Self: Sized,
    {
        match Self::pull_from_xxs_array(arrays)? {
            Some(data) => Ok(Some(Self::process(data, arrays, dependencies)?)),
            None => Ok(None),
        }
    }
}

impl<'a, T> Parse<'a> for T where T: Process<'a> + PullFromXXS<'a> {}

//=====================================================================
// Helper functions to make working with the XXS array easier.
//=====================================================================

// Once the NXS and JXS arrays are loaded, they tell us whether a block
// must be present. A block that is absent when the descriptor says it
// must exist, or present when the descriptor says it cannot, means the
// two control arrays disagree with each other, and the table cannot be
// trusted. Start indices in the jump table are one-based; the returned
// index is zero-based.
pub fn get_block_start(
    block_type: &BlockType,
    arrays: &Arrays,
    is_expected: bool,
) -> Result<Option<usize>> {
    let start_index = arrays.jxs.get(block_type);
    match (is_expected, start_index) {
        (true, 0) => Err(GraceError::format(format!(
            "{} block is required by the descriptor array but missing from the jump table",
            block_type
        ))),
        (true, start) => Ok(Some(start - 1)),
        (false, 0) => Ok(None),
        (false, _) => Err(GraceError::format(format!(
            "{} block is present but the descriptor array says it cannot be",
            block_type
        ))),
    }
}

pub fn block_range_to_slice<'a>(
    block_start: usize,
    block_length: usize,
    arrays: &'a Arrays,
) -> Result<&'a [f64]> {
    arrays
        .xxs
        .get(block_start..block_start + block_length)
        .ok_or_else(|| {
            GraceError::format(format!(
                "block [{}..{}) extends past payload of length {}",
                block_start,
                block_start + block_length,
                arrays.xxs.len()
            ))
        })
}

// Read one payload value that the format defines to be an integer
// count or locator. The payload is parsed as floats, so integer
// values arrive as exact whole-number f64s.
pub fn integer_at(arrays: &Arrays, index: usize) -> Result<i64> {
    arrays
        .xxs
        .get(index)
        .map(|&v| v as i64)
        .ok_or_else(|| {
            GraceError::format(format!(
                "payload index {} out of bounds (length {})",
                index,
                arrays.xxs.len()
            ))
        })
}
