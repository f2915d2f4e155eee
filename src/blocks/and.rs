use crate::arrays::Arrays;
use crate::blocks::block_traits::{
    PullFromXXS, Process, block_range_to_slice, get_block_start, integer_at,
};
use crate::blocks::{BlockType, LAND};
use crate::error::{GraceError, Result};

//=====================================================================
// AND data block
//
// Angular distribution data for every channel LAND points into. Each
// entry is laid out as [NE, energies(NE), locators(NE)] followed by
// the distribution tables. An inner locator is one-based relative to
// the start of the AND block: positive points at a 33-value
// equiprobable-cosine-bin table, 0 means isotropic at that energy,
// and negative means the distribution is supplied through a
// different block and carries no cosines here.
//
// Sampling from these tables is out of scope for the loader;
// reactions only keep a pointer to their entry. What the loader does
// own is data hygiene: equiprobable bin edges are cosines and must
// lie in [-1, 1], and values that drift slightly outside (a known
// defect of some processing chains) are clamped and logged rather
// than rejected.
//=====================================================================

pub const COSINE_BINS_PER_TABLE: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AND {
    pub start: usize,
}

impl<'a> PullFromXXS<'a> for AND {
    fn pull_from_xxs_array(arrays: &'a Arrays) -> Result<Option<&'a [f64]>> {
        // Elastic scattering always has angular data, so the block is
        // always present.
        let always_expected = true;

        let Some(block_start) = get_block_start(&BlockType::AND, arrays, always_expected)? else {
            return Ok(None);
        };

        // The extent is not declared anywhere; walk every entry LAND
        // points at and keep the furthest end seen.
        let Some(land_data) = LAND::pull_from_xxs_array(arrays)? else {
            return Ok(None);
        };

        let mut block_end = 0;
        for &outer in land_data {
            let outer = outer as i64;
            if outer <= 0 {
                continue;
            }
            let entry = outer as usize - 1;
            let num_energies = integer_at(arrays, block_start + entry)?;
            if num_energies < 1 {
                return Err(GraceError::format(format!(
                    "angular entry declares {} energies",
                    num_energies
                )));
            }
            let num_energies = num_energies as usize;
            block_end = block_end.max(entry + 1 + 2 * num_energies);
            for j in 0..num_energies {
                let inner = integer_at(arrays, block_start + entry + 1 + num_energies + j)?;
                if inner > 0 {
                    block_end = block_end.max(inner as usize - 1 + COSINE_BINS_PER_TABLE);
                }
            }
        }

        Ok(Some(block_range_to_slice(block_start, block_end, arrays)?))
    }
}

impl<'a> Process<'a> for AND {
    type Dependencies = ();

    fn process(_data: &[f64], arrays: &Arrays, _dependencies: ()) -> Result<Self> {
        Ok(Self {
            start: arrays.jxs.get(&BlockType::AND) - 1,
        })
    }
}

impl std::fmt::Display for AND {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AND(start={})", self.start)
    }
}

/// Clamp equiprobable-bin cosines to [-1, 1] in place, returning how
/// many values were corrected. Runs after block parsing because it is
/// the one place the loader writes back into the payload.
pub fn scrub_cosines(
    xxs: &mut [f64],
    and_start: usize,
    land: &LAND,
    table_name: &str,
) -> Result<usize> {
    let mut clamped = 0;
    for &outer in land.iter() {
        if outer <= 0 {
            continue;
        }
        let entry = and_start + outer as usize - 1;
        let num_energies = read_count(xxs, entry)?;
        for j in 0..num_energies {
            let inner = *xxs
                .get(entry + 1 + num_energies + j)
                .ok_or_else(|| GraceError::format("angular entry runs past the payload"))?
                as i64;
            if inner <= 0 {
                continue;
            }
            let table = and_start + inner as usize - 1;
            for k in 0..COSINE_BINS_PER_TABLE {
                let value = *xxs
                    .get(table + k)
                    .ok_or_else(|| GraceError::format("cosine table runs past the payload"))?;
                if !(-1.0..=1.0).contains(&value) {
                    log::warn!(
                        "{}: angular cosine {} outside [-1, 1], clamped",
                        table_name,
                        value
                    );
                    xxs[table + k] = value.clamp(-1.0, 1.0);
                    clamped += 1;
                }
            }
        }
    }
    Ok(clamped)
}

fn read_count(xxs: &[f64], index: usize) -> Result<usize> {
    let value = *xxs
        .get(index)
        .ok_or_else(|| GraceError::format("angular entry runs past the payload"))? as i64;
    if value < 1 {
        return Err(GraceError::format(format!(
            "angular entry declares {} energies",
            value
        )));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One entry at relative position 1: NE=1, one energy, one inner
    // locator pointing at a 33-value table at relative position 4.
    fn one_entry_payload() -> Vec<f64> {
        let mut xxs = vec![1.0, 1.0e-11, 4.0];
        for i in 0..COSINE_BINS_PER_TABLE {
            xxs.push(-1.0 + 2.0 * (i as f64) / 32.0);
        }
        xxs
    }

    #[test]
    fn test_scrub_leaves_good_cosines_alone() {
        let mut xxs = one_entry_payload();
        let land = LAND(vec![1]);
        let clamped = scrub_cosines(&mut xxs, 0, &land, "26056.03c").unwrap();
        assert_eq!(clamped, 0);
    }

    #[test]
    fn test_scrub_clamps_out_of_range_cosines() {
        let mut xxs = one_entry_payload();
        xxs[3] = -1.0000002;
        xxs[35] = 1.0000004;
        let land = LAND(vec![1]);

        let clamped = scrub_cosines(&mut xxs, 0, &land, "26056.03c").unwrap();
        assert_eq!(clamped, 2);
        assert_eq!(xxs[3], -1.0);
        assert_eq!(xxs[35], 1.0);
    }

    #[test]
    fn test_scrub_skips_isotropic_and_external_channels() {
        let mut xxs = vec![0.0; 4];
        let land = LAND(vec![0, -1]);
        let clamped = scrub_cosines(&mut xxs, 0, &land, "26056.03c").unwrap();
        assert_eq!(clamped, 0);
    }

    #[test]
    fn test_scrub_truncated_table_is_fatal() {
        // Entry claims a table that runs off the payload.
        let mut xxs = vec![1.0, 1.0e-11, 4.0, 0.5];
        let land = LAND(vec![1]);
        assert!(scrub_cosines(&mut xxs, 0, &land, "26056.03c").is_err());
    }
}
