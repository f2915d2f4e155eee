use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::{Deref, DerefMut};

use strum::IntoEnumIterator;

use crate::blocks::BlockType;
use crate::error::{GraceError, Result};
use crate::utils;

//=====================================================================
// The JXS jump table of an ACE table: thirty-two integers, eight per
// line, giving the one-based starting index of each data block within
// the XXS payload. A zero entry means the block is absent. Two of the
// thirty-two slots are unassigned in the format and are dropped here.
//=====================================================================

#[derive(Clone, Debug, Default)]
pub struct JxsArray {
    pub block_starting_indices: HashMap<BlockType, usize>,
}

impl Deref for JxsArray {
    type Target = HashMap<BlockType, usize>;

    fn deref(&self) -> &Self::Target {
        &self.block_starting_indices
    }
}

impl DerefMut for JxsArray {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.block_starting_indices
    }
}

impl JxsArray {
    // Every block type is inserted at parse time, so a missing key is
    // a programming error, not a data error.
    pub fn get(&self, key: &BlockType) -> usize {
        *self
            .block_starting_indices
            .get(key)
            .unwrap_or_else(|| panic!("could not find {} in JXS array", key))
    }

    pub fn from_ascii_file(reader: &mut BufReader<File>) -> Result<Self> {
        // A JXS array consists of 4 lines, each with eight integers.
        let jxs_array_text = utils::read_lines(reader, 4)?;

        let jxs_array_entries: Vec<usize> = jxs_array_text
            .iter()
            .map(|line| utils::parse_integer_fields(line))
            .collect::<Result<Vec<_>>>()?
            .concat();

        if jxs_array_entries.len() != 32 {
            return Err(GraceError::format(format!(
                "jump table has {} entries, wanted 32",
                jxs_array_entries.len()
            )));
        }

        // Fill in our array by looping over all block types.
        let mut jxs_array = JxsArray::default();
        for block_type in BlockType::iter() {
            let jxs_index = JxsArray::index_from_block_type(&block_type);
            jxs_array.insert(block_type, jxs_array_entries[jxs_index]);
        }

        Ok(jxs_array)
    }

    // For a given block type, the position in the JXS array holding
    // its starting index within the XXS array. Slots 27 and 28 are
    // unassigned in the format.
    fn index_from_block_type(block_type: &BlockType) -> usize {
        match block_type {
            BlockType::ESZ => 0,
            BlockType::NU => 1,
            BlockType::MTR => 2,
            BlockType::LQR => 3,
            BlockType::TYR => 4,
            BlockType::LSIG => 5,
            BlockType::SIG => 6,
            BlockType::LAND => 7,
            BlockType::AND => 8,
            BlockType::LDLW => 9,
            BlockType::DLW => 10,
            BlockType::GPD => 11,
            BlockType::MTRP => 12,
            BlockType::LSIGP => 13,
            BlockType::SIGP => 14,
            BlockType::LANDP => 15,
            BlockType::ANDP => 16,
            BlockType::LDLWP => 17,
            BlockType::DLWP => 18,
            BlockType::YP => 19,
            BlockType::FIS => 20,
            BlockType::END => 21,
            BlockType::LUND => 22,
            BlockType::DNU => 23,
            BlockType::BDD => 24,
            BlockType::DNEDL => 25,
            BlockType::DNED => 26,
            BlockType::PTYPE => 29,
            BlockType::NTRO => 30,
            BlockType::NEXT => 31,
        }
    }
}

impl fmt::Display for JxsArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut present: Vec<String> = BlockType::iter()
            .filter(|b| self.get(b) != 0)
            .map(|b| format!("{}", b))
            .collect();
        present.sort();
        write!(f, "JxsArray({})", present.join(" "))
    }
}
