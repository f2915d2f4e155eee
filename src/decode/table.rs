use std::fmt;
use std::fs::File;
use std::io::BufReader;

use crate::arrays::{Arrays, JxsArray, NxsArray};
use crate::error::{GraceError, Result};
use crate::header::Header;
use crate::utils;

//=====================================================================
// One ACE table, fully read into memory: header, NXS descriptor, JXS
// jump table, and the XXS payload. A library file is a plain
// concatenation of tables, so finding a nuclide means scanning from
// the top and stepping over every table that does not answer to the
// requested identifier. The descriptor makes that cheap: it declares
// the payload length, which fixes the table's line count.
//=====================================================================

#[derive(Debug)]
pub struct AceTable {
    pub header: Header,
    pub nxs: NxsArray,
    pub jxs: JxsArray,
    pub xxs: Vec<f64>,
}

// Payload values are written four per line.
const XXS_VALUES_PER_LINE: usize = 4;

impl AceTable {
    /// Scan a library for the table matching `target` by name or
    /// alias. A full scan without a match is a format error, as is a
    /// library that ends mid-table.
    pub fn locate(reader: &mut BufReader<File>, target: &str) -> Result<AceTable> {
        loop {
            let Some(header) = Header::from_ascii_file(reader)? else {
                return Err(GraceError::format(format!(
                    "table {} not found in library",
                    target
                )));
            };
            let nxs = NxsArray::from_ascii_file(reader)?;
            if header.matches(target) {
                return AceTable::read_body(reader, header, nxs);
            }
            AceTable::skip_body(reader, &nxs)?;
        }
    }

    fn read_body(reader: &mut BufReader<File>, header: Header, nxs: NxsArray) -> Result<AceTable> {
        let jxs = JxsArray::from_ascii_file(reader)?;

        let payload_lines = utils::read_lines(reader, nxs.xxs_len.div_ceil(XXS_VALUES_PER_LINE))?;
        let xxs: Vec<f64> = payload_lines
            .iter()
            .map(|line| utils::parse_float_fields(line))
            .collect::<Result<Vec<_>>>()?
            .concat();

        if xxs.len() != nxs.xxs_len {
            return Err(GraceError::format(format!(
                "payload has {} values, descriptor declares {}",
                xxs.len(),
                nxs.xxs_len
            )));
        }

        Ok(AceTable {
            header,
            nxs,
            jxs,
            xxs,
        })
    }

    // Step over the jump table and payload of a table we do not want.
    fn skip_body(reader: &mut BufReader<File>, nxs: &NxsArray) -> Result<()> {
        utils::skip_lines(reader, 4 + nxs.xxs_len.div_ceil(XXS_VALUES_PER_LINE))
    }

    /// Borrowed view of the control arrays and payload, the form the
    /// block parsers consume.
    pub fn arrays(&self) -> Arrays<'_> {
        Arrays {
            nxs: &self.nxs,
            jxs: &self.jxs,
            xxs: &self.xxs,
        }
    }
}

impl fmt::Display for AceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AceTable({}, {} energies, {} channels)",
            self.header.name, self.nxs.nes, self.nxs.ntr
        )
    }
}
