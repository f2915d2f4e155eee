use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{GraceError, Result};

//====================================================================
// Assorted helper functions shared by the header, array, and payload
// readers.
//====================================================================

// Read exactly the specified number of lines from a BufReader. A
// short read means the table was cut off mid-structure, which is a
// format error rather than a clean end of file.
pub fn read_lines(reader: &mut BufReader<File>, num_lines: usize) -> Result<Vec<String>> {
    let lines = reader
        .lines()
        .take(num_lines)
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| GraceError::format(format!("read failed: {}", e)))?;
    if lines.len() < num_lines {
        return Err(GraceError::format(format!(
            "unexpected end of file, wanted {} lines but got {}",
            num_lines,
            lines.len()
        )));
    }
    Ok(lines)
}

// Advance past a specified number of lines without keeping them.
pub fn skip_lines(reader: &mut BufReader<File>, num_lines: usize) -> Result<()> {
    read_lines(reader, num_lines).map(|_| ())
}

// Split a line on whitespace and parse every field as f64.
pub fn parse_float_fields(line: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|token| {
            fast_float::parse(token)
                .map_err(|_| GraceError::format(format!("unparseable numeric field \"{token}\"")))
        })
        .collect()
}

// Split a line on whitespace and parse every field as usize.
pub fn parse_integer_fields(line: &str) -> Result<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| GraceError::format(format!("unparseable integer field \"{token}\"")))
        })
        .collect()
}

// Provided a temperature in MeV, convert to K
#[inline]
pub fn compute_temperature_from_kT(kT: f64) -> f64 {
    kT * 1e6 / 8.617333262e-5
}
