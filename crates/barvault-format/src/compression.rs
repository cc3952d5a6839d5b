//! Output compression.

use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::FormatError;

/// Compression applied to a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// gzip (`.csv.gz`).
    #[default]
    Gzip,
    /// xz (`.csv.xz`).
    Xz,
    /// Uncompressed (`.csv`).
    None,
}

impl Compression {
    /// Returns the file extension, without leading dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => "csv.gz",
            Self::Xz => "csv.xz",
            Self::None => "csv",
        }
    }

    /// Returns the compression name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Xz => "xz",
            Self::None => "none",
        }
    }

    /// Returns all available compressions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Gzip, Self::Xz, Self::None]
    }

    /// Compresses `raw`.
    ///
    /// The gzip header carries no timestamp, so equal input gives equal output.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder fails.
    pub fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(raw)?;
                Ok(encoder.finish()?)
            }
            Self::Xz => {
                let mut input = raw;
                let mut output = Vec::new();
                lzma_rs::xz_compress(&mut input, &mut output)?;
                Ok(output)
            }
            Self::None => Ok(raw.to_vec()),
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Compression {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gzip" | "gz" => Ok(Self::Gzip),
            "xz" | "lzma" => Ok(Self::Xz),
            "none" | "plain" | "csv" => Ok(Self::None),
            _ => Err(FormatError::UnknownCompression(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const RAW: &[u8] = b"Date;Open;High;Low;Close;Volume\n2018-03-09 14:30:00;1;2;0.5;1.5;10\n";

    #[test]
    fn test_gzip_decodes_and_is_deterministic() {
        let first = Compression::Gzip.encode(RAW).unwrap();
        let second = Compression::Gzip.encode(RAW).unwrap();
        assert_eq!(first, second);

        let mut decoded = Vec::new();
        flate2::read::GzDecoder::new(first.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, RAW);
    }

    #[test]
    fn test_xz_decodes() {
        let encoded = Compression::Xz.encode(RAW).unwrap();
        let mut decoded = Vec::new();
        lzma_rs::xz_decompress(&mut encoded.as_slice(), &mut decoded).unwrap();
        assert_eq!(decoded, RAW);
    }

    #[test]
    fn test_compression_parse_and_extension() {
        assert_eq!("GZ".parse::<Compression>().unwrap(), Compression::Gzip);
        assert_eq!("xz".parse::<Compression>().unwrap().extension(), "csv.xz");
        assert_eq!(Compression::default().extension(), "csv.gz");
        assert!("zip".parse::<Compression>().is_err());
    }
}
