use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{GraceError, Result};
use crate::utils;

//=====================================================================
// Support for the headers of ACE tables. These carry the high-level
// identity of one nuclide at one temperature: the legacy name, the
// optional modern alias, the atomic weight ratio, and kT.
//
// Two header layouts exist in the wild. The legacy layout is two
// lines, the first holding name, atomic weight ratio, and kT, the
// second free-text description. The versioned layout prefixes a line
// of the form `2.0.x <alias> <comment-count>`, then that many comment
// lines, then the same two legacy lines.
//=====================================================================

#[derive(Clone, Debug)]
pub struct Header {
    pub name: String,
    pub alias: Option<String>,
    pub atomic_weight_ratio: f64,
    pub kT: f64,
    pub temperature: f64,
}

impl Header {
    // The header is not a fixed size, so it gets its own incremental
    // parser rather than going through the block machinery. Returns
    // Ok(None) on a clean end of file, which during a scan just means
    // there are no tables left.
    pub fn from_ascii_file(reader: &mut BufReader<File>) -> Result<Option<Self>> {
        // Tolerate blank lines between tables and at the end of the
        // library.
        let mut first = String::new();
        loop {
            first.clear();
            let n = reader
                .read_line(&mut first)
                .map_err(|e| GraceError::format(format!("read failed: {}", e)))?;
            if n == 0 {
                return Ok(None);
            }
            if !first.trim().is_empty() {
                break;
            }
        }

        // A versioned header starts with a `2.0.x` token and tells us
        // how many comment lines to step over before the legacy pair.
        let fields: Vec<&str> = first.split_whitespace().collect();
        let versioned = fields.first().is_some_and(|f| f.starts_with("2.0."));
        let (alias, legacy_header) = if versioned {
            let alias = fields.get(1).map(|s| s.to_string());
            let comment_count: usize = fields
                .get(2)
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| GraceError::format("versioned header missing comment count"))?;
            utils::skip_lines(reader, comment_count)?;
            (alias, utils::read_lines(reader, 2)?)
        } else {
            let mut legacy_header = vec![first];
            legacy_header.extend(utils::read_lines(reader, 1)?);
            (None, legacy_header)
        };

        // Name, atomic weight ratio, and kT all sit on the first
        // legacy line. The second line is free text and is dropped.
        let fields: Vec<&str> = legacy_header[0].split_whitespace().collect();
        if fields.len() < 3 {
            return Err(GraceError::format(format!(
                "malformed header line \"{}\"",
                legacy_header[0].trim_end()
            )));
        }
        let name = fields[0].to_string();
        let atomic_weight_ratio: f64 = fields[1]
            .parse()
            .map_err(|_| GraceError::format(format!("bad atomic weight ratio \"{}\"", fields[1])))?;
        let kT: f64 = fields[2]
            .parse()
            .map_err(|_| GraceError::format(format!("bad kT value \"{}\"", fields[2])))?;
        let temperature = utils::compute_temperature_from_kT(kT);

        Ok(Some(Self {
            name,
            alias,
            atomic_weight_ratio,
            kT,
            temperature,
        }))
    }

    // A table answers to its legacy name or its modern alias.
    pub fn matches(&self, target: &str) -> bool {
        self.name == target || self.alias.as_deref() == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::create_reader_from_string;

    use approx::assert_abs_diff_eq;

    #[test]
    fn test_legacy_header_parsing() {
        let legacy_header = concat!(
            "  1100.00c    99.999  2.5301E-08   05/02/18\n",
            "H100 TEST (author)  Reference some_report by Author, A.B, et al.    mat 123\n"
        );
        let mut reader = create_reader_from_string(legacy_header);

        let header = Header::from_ascii_file(&mut reader)
            .expect("failed to parse legacy header")
            .expect("header reported end of file");

        assert_eq!(header.name, "1100.00c");
        assert_eq!(header.alias, None);
        assert_abs_diff_eq!(header.atomic_weight_ratio, 99.999, epsilon = 1e-5);
        assert_abs_diff_eq!(header.kT, 2.5301e-08, epsilon = 1e-12);
        assert_abs_diff_eq!(header.temperature, 293.605912998, epsilon = 1e-5);
    }

    #[test]
    fn test_versioned_header_parsing() {
        let versioned_header = concat!(
            "2.0.1  1100.800nc  2\n",
            "comment line one\n",
            "comment line two\n",
            "  1100.00c    99.999  2.5301E-08   05/02/18\n",
            "H100 TEST (author)  Reference some_report by Author, A.B, et al.    mat 123\n"
        );
        let mut reader = create_reader_from_string(versioned_header);

        let header = Header::from_ascii_file(&mut reader)
            .expect("failed to parse versioned header")
            .expect("header reported end of file");

        assert_eq!(header.name, "1100.00c");
        assert_eq!(header.alias, Some(String::from("1100.800nc")));
        assert_abs_diff_eq!(header.atomic_weight_ratio, 99.999, epsilon = 1e-5);
    }

    #[test]
    fn test_matches_name_and_alias() {
        let versioned_header = concat!(
            "2.0.1  1100.800nc  0\n",
            "  1100.00c    99.999  2.5301E-08   05/02/18\n",
            "H100 TEST\n"
        );
        let mut reader = create_reader_from_string(versioned_header);
        let header = Header::from_ascii_file(&mut reader).unwrap().unwrap();

        assert!(header.matches("1100.00c"));
        assert!(header.matches("1100.800nc"));
        assert!(!header.matches("1100.900nc"));
    }

    #[test]
    fn test_end_of_file_is_not_an_error() {
        // A trailing blank line is just the end of the library.
        let mut reader = create_reader_from_string("\n   \n");
        let header = Header::from_ascii_file(&mut reader).unwrap();
        assert!(header.is_none());
    }

    #[test]
    fn test_truncated_header_is_fatal() {
        let mut reader = create_reader_from_string("2.0.1  1100.800nc  0");
        let result = Header::from_ascii_file(&mut reader);
        assert!(result.is_err());
    }
}
