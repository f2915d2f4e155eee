#![allow(unused)]

//=====================================================================
// Utility functions to aid in accelerating testing
//
// The central piece is TestTable, a builder that renders a synthetic
// nuclide into the wire format. Tests describe the channels they need
// and get back a complete library text whose descriptor, jump table,
// and payload offsets are computed rather than hand-counted.
//=====================================================================

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Seek, Write};

use lazy_static::lazy_static;
use tempfile::{NamedTempFile, tempfile};

use crate::arena::{Handle, RecordArena};
use crate::config::LoaderConfig;
use crate::data::{Nuclide, Reaction};
use crate::decode::AceTable;

// Create a reader from a string to aid in testing
#[inline]
pub fn create_reader_from_string(content: &str) -> BufReader<File> {
    let mut test_file = tempfile().unwrap();
    writeln!(&mut test_file, "{}", content).unwrap();
    test_file.seek(std::io::SeekFrom::Start(0)).unwrap();
    BufReader::new(test_file)
}

// Write a library text to a named file for path-based entry points.
pub fn write_library_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// One reaction channel of a synthetic table.
pub struct TestChannel {
    pub mt: i32,
    pub q: f64,
    /// Combined multiplicity/frame code.
    pub ty: i64,
    /// One-based index on the union grid of the first tabulated point.
    pub grid_start: usize,
    pub xs: Vec<f64>,
}

impl TestChannel {
    pub fn new(mt: i32, q: f64, ty: i64, grid_start: usize, xs: Vec<f64>) -> Self {
        TestChannel {
            mt,
            q,
            ty,
            grid_start,
            xs,
        }
    }
}

/// A synthetic nuclide that renders itself into the wire format.
pub struct TestTable {
    pub name: String,
    pub atomic_weight_ratio: f64,
    pub kT: f64,
    pub za: usize,
    /// Ground/isomeric indicator.
    pub s: usize,
    pub energy_grid: Vec<f64>,
    pub elastic_xs: Vec<f64>,
    pub channels: Vec<TestChannel>,
    /// Adds a photon production block when present.
    pub photon_xs: Option<Vec<f64>>,
}

impl TestTable {
    pub fn render(&self) -> String {
        let nes = self.energy_grid.len();
        let ntr = self.channels.len();
        let nr = self.channels.iter().filter(|c| c.ty != 0).count();
        debug_assert!(
            self.channels.iter().take(nr).all(|c| c.ty != 0),
            "channels producing secondary neutrons must be listed first"
        );

        // Assemble the payload front to back, recording each block's
        // one-based start as it is laid down.
        let mut xxs: Vec<f64> = Vec::new();

        let esz_start = 1;
        xxs.extend(&self.energy_grid);
        // Total and disappearance columns are not consumed here;
        // zeros keep the five-column layout honest.
        xxs.extend(vec![0.0; 2 * nes]);
        xxs.extend(&self.elastic_xs);
        xxs.extend((0..nes).map(|k| 0.25 * (k + 1) as f64));

        let mtr_start = if ntr > 0 { xxs.len() + 1 } else { 0 };
        xxs.extend(self.channels.iter().map(|c| c.mt as f64));
        let lqr_start = if ntr > 0 { xxs.len() + 1 } else { 0 };
        xxs.extend(self.channels.iter().map(|c| c.q));
        let tyr_start = if ntr > 0 { xxs.len() + 1 } else { 0 };
        xxs.extend(self.channels.iter().map(|c| c.ty as f64));

        let lsig_start = if ntr > 0 { xxs.len() + 1 } else { 0 };
        let mut entry = 1;
        for channel in &self.channels {
            xxs.push(entry as f64);
            entry += 2 + channel.xs.len();
        }
        let sig_start = if ntr > 0 { xxs.len() + 1 } else { 0 };
        for channel in &self.channels {
            xxs.push(channel.grid_start as f64);
            xxs.push(channel.xs.len() as f64);
            xxs.extend(&channel.xs);
        }

        // Elastic gets the one stored angular table, every other
        // neutron producer is isotropic.
        let land_start = xxs.len() + 1;
        xxs.push(1.0);
        xxs.extend(vec![0.0; nr]);
        let and_start = xxs.len() + 1;
        xxs.push(1.0);
        xxs.push(self.energy_grid[0]);
        xxs.push(4.0);
        xxs.extend((0..33).map(|i| -1.0 + i as f64 / 16.0));

        let gpd_start = match &self.photon_xs {
            Some(photon) => {
                debug_assert_eq!(photon.len(), nes);
                let start = xxs.len() + 1;
                xxs.extend(photon);
                start
            }
            None => 0,
        };

        let nxs = [
            xxs.len(),
            self.za,
            nes,
            ntr,
            nr,
            0,
            0,
            0,
            self.s,
            self.za / 1000,
            self.za % 1000,
            0,
            0,
            0,
            0,
            0,
        ];
        let mut jxs = [0usize; 32];
        jxs[0] = esz_start;
        jxs[2] = mtr_start;
        jxs[3] = lqr_start;
        jxs[4] = tyr_start;
        jxs[5] = lsig_start;
        jxs[6] = sig_start;
        jxs[7] = land_start;
        jxs[8] = and_start;
        jxs[11] = gpd_start;

        let mut text = String::new();
        writeln!(
            text,
            "  {}  {:.6}  {:.4E}   01/01/24",
            self.name, self.atomic_weight_ratio, self.kT
        )
        .unwrap();
        writeln!(text, "{} synthetic test table", self.name).unwrap();
        for row in nxs.chunks(8) {
            for value in row {
                write!(text, "{:>9}", value).unwrap();
            }
            text.push('\n');
        }
        for row in jxs.chunks(8) {
            for value in row {
                write!(text, "{:>9}", value).unwrap();
            }
            text.push('\n');
        }
        for row in xxs.chunks(4) {
            for value in row {
                write!(text, "{:>20.12E}", value).unwrap();
            }
            text.push('\n');
        }
        text
    }
}

// An iron-flavored table: one threshold (n,2n) channel and one
// capture channel on a four-point grid.
pub fn simple_table() -> TestTable {
    TestTable {
        name: "26056.00c".to_string(),
        atomic_weight_ratio: 55.4544,
        kT: 2.5301e-8,
        za: 26056,
        s: 0,
        energy_grid: vec![1.0e-11, 1.0, 5.0, 20.0],
        elastic_xs: vec![20.0, 10.0, 5.0, 2.0],
        channels: vec![
            TestChannel::new(16, -11.2, -2, 3, vec![0.0, 0.5]),
            TestChannel::new(102, 7.6, 0, 1, vec![30.0, 3.0, 1.0, 0.1]),
        ],
        photon_xs: None,
    }
}

// A uranium-flavored table carrying a fission channel.
pub fn fissile_table() -> TestTable {
    TestTable {
        name: "92235.00c".to_string(),
        atomic_weight_ratio: 233.0248,
        kT: 2.5301e-8,
        za: 92235,
        s: 0,
        energy_grid: vec![1.0e-11, 1.0, 20.0],
        elastic_xs: vec![15.0, 10.0, 8.0],
        channels: vec![
            TestChannel::new(18, 193.4, 19, 1, vec![585.0, 4.0, 2.0]),
            TestChannel::new(102, 6.5, 0, 1, vec![98.0, 1.0, 0.2]),
        ],
        photon_xs: None,
    }
}

// An isomeric target (americium-flavored) with one discrete inelastic
// level, so the decoder synthesizes the any-level aggregate.
pub fn isomeric_table() -> TestTable {
    TestTable {
        name: "95242.01c".to_string(),
        atomic_weight_ratio: 239.9801,
        kT: 2.5301e-8,
        za: 95242,
        s: 1,
        energy_grid: vec![1.0e-11, 1.0, 20.0],
        elastic_xs: vec![12.0, 9.0, 6.0],
        channels: vec![
            TestChannel::new(51, -0.044, 1, 1, vec![1.0, 0.8, 0.5]),
            TestChannel::new(102, 5.5, 0, 1, vec![60.0, 2.0, 0.4]),
        ],
        photon_xs: None,
    }
}

lazy_static! {
    // Rendered once and shared by every test that scans a library.
    pub static ref TEST_LIBRARY_TEXT: String = [
        simple_table().render(),
        fissile_table().render(),
        isomeric_table().render(),
    ]
    .concat();
}

/// Render, locate, and decode a synthetic table in one step.
pub fn decode_test_table(
    table: &TestTable,
    config: &LoaderConfig,
) -> (RecordArena<Reaction>, Nuclide) {
    let mut reader = create_reader_from_string(&table.render());
    let ace = AceTable::locate(&mut reader, &table.name).unwrap();
    let mut arena = RecordArena::new(config.max_arena_records);
    let nuclide = ace.decode(config, &mut arena).unwrap();
    (arena, nuclide)
}

/// First record in the nuclide's chain carrying the wanted MT.
pub fn find_mt(arena: &RecordArena<Reaction>, nuclide: &Nuclide, mt: i32) -> Handle<Reaction> {
    arena
        .iter(nuclide.reactions)
        .find(|&h| arena[h].mt == mt)
        .unwrap_or_else(|| panic!("no MT {} in reaction list", mt))
}

/// Number of records in the nuclide's chain carrying the wanted MT.
pub fn mt_count(arena: &RecordArena<Reaction>, nuclide: &Nuclide, mt: i32) -> usize {
    arena.iter(nuclide.reactions).filter(|&h| arena[h].mt == mt).count()
}
