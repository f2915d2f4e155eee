use std::fmt;
use std::fs::File;
use std::io::BufReader;

use crate::error::{GraceError, Result};
use crate::utils;

//=====================================================================
// The NXS descriptor array of an ACE table: sixteen integers, eight
// per line, giving the element counts that shape the XXS payload to
// follow. Entry 0 is the total payload length, which is what the
// sequential scan uses to step over tables it does not want.
//=====================================================================

// Indices of the entries we consume. The remaining five are reserved.
enum NxsIndex {
    XxsLen = 0,
    Za = 1,
    Nes = 2,
    Ntr = 3,
    Nr = 4,
    Ntrp = 5,
    Ntype = 6,
    Npcr = 7,
    S = 8,
    Z = 9,
    A = 10,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NxsArray {
    pub xxs_len: usize, // Number of entries in XXS array
    pub za: usize,      // ZA of the nuclide
    pub nes: usize,     // Number of energies on the union grid
    pub ntr: usize,     // Number of reactions excluding elastic scattering
    pub nr: usize,      // Number of reactions producing secondary neutrons, excluding elastic
    pub ntrp: usize,    // Number of photon production reactions
    pub ntype: usize,   // Number of particle types with production data
    pub npcr: usize,    // Number of delayed neutron precursor families
    pub s: usize,       // Isomeric state index
    pub z: usize,       // Atomic number (versioned header only, else 0)
    pub a: usize,       // Atomic mass number (versioned header only, else 0)
}

impl NxsArray {
    pub fn from_ascii_file(reader: &mut BufReader<File>) -> Result<Self> {
        // A NXS array consists of 2 lines, each with eight integers.
        let nxs_array_text = utils::read_lines(reader, 2)?;

        let nxs_array: Vec<usize> = nxs_array_text
            .iter()
            .map(|line| utils::parse_integer_fields(line))
            .collect::<Result<Vec<_>>>()?
            .concat();

        if nxs_array.len() != 16 {
            return Err(GraceError::format(format!(
                "descriptor array has {} entries, wanted 16",
                nxs_array.len()
            )));
        }

        Ok(Self {
            xxs_len: nxs_array[NxsIndex::XxsLen as usize],
            za: nxs_array[NxsIndex::Za as usize],
            nes: nxs_array[NxsIndex::Nes as usize],
            ntr: nxs_array[NxsIndex::Ntr as usize],
            nr: nxs_array[NxsIndex::Nr as usize],
            ntrp: nxs_array[NxsIndex::Ntrp as usize],
            ntype: nxs_array[NxsIndex::Ntype as usize],
            npcr: nxs_array[NxsIndex::Npcr as usize],
            s: nxs_array[NxsIndex::S as usize],
            z: nxs_array[NxsIndex::Z as usize],
            a: nxs_array[NxsIndex::A as usize],
        })
    }
}

impl fmt::Display for NxsArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NxsArray(za={} nes={} ntr={} xxs_len={})",
            self.za, self.nes, self.ntr, self.xxs_len
        )
    }
}
