//! Archive file access with automatic gzip and bzip2 handling
//!
//! Paths ending in `.gz` or `.bz2` (case-insensitive) are decompressed on
//! read and compressed on write; `-` reads from stdin.
//!
//! ```rust,no_run
//! use boardarchive::file_reader;
//!
//! // Decompressed transparently, BOM stripped
//! let text = file_reader::read_archive_text("board.txt.gz")?;
//! println!("{} bytes of archive text", text.len());
//! # Ok::<(), boardarchive::ArchiveError>(())
//! ```

use crate::error::{ArchiveError, Result};
use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fmt;
use std::fs::File;
use std::io::{self, stdin, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Buffer size for file reading and writing
const BUFFER_SIZE: usize = 128 * 1024;

/// Text encoding announced by a byte-order mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8, with or without a BOM
    Utf8,
    /// UTF-16 little endian
    Utf16Le,
    /// UTF-16 big endian
    Utf16Be,
    /// UTF-32 little endian
    Utf32Le,
    /// UTF-32 big endian
    Utf32Be,
    /// UTF-7
    Utf7,
    /// UTF-EBCDIC
    UtfEbcdic,
    /// Standard Compression Scheme for Unicode
    Scsu,
}

impl Encoding {
    /// Length of the byte-order mark for this encoding
    fn bom_len(self) -> usize {
        match self {
            Encoding::Utf16Le | Encoding::Utf16Be => 2,
            Encoding::Utf8 | Encoding::Scsu => 3,
            Encoding::Utf32Le | Encoding::Utf32Be | Encoding::Utf7 | Encoding::UtfEbcdic => 4,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Utf7 => "UTF-7",
            Encoding::UtfEbcdic => "UTF-EBCDIC",
            Encoding::Scsu => "SCSU",
        };
        f.write_str(name)
    }
}

/// Detect the encoding from a leading byte-order mark.
///
/// Longer marks win over shorter ones they start with (a UTF-32LE mark also
/// begins with the UTF-16LE mark). Without a mark the text is assumed to be
/// UTF-8. Returns the encoding and whether a mark was present.
pub fn detect_encoding(bytes: &[u8]) -> (Encoding, bool) {
    let marks: &[(&[u8], Encoding)] = &[
        (&[0xFF, 0xFE, 0x00, 0x00], Encoding::Utf32Le),
        (&[0x00, 0x00, 0xFE, 0xFF], Encoding::Utf32Be),
        (&[0xDD, 0x73, 0x66, 0x73], Encoding::UtfEbcdic),
        (b"+/v8", Encoding::Utf7),
        (b"+/v9", Encoding::Utf7),
        (b"+/v+", Encoding::Utf7),
        (b"+/v/", Encoding::Utf7),
        (&[0xEF, 0xBB, 0xBF], Encoding::Utf8),
        (&[0x0E, 0xFE, 0xFF], Encoding::Scsu),
        (&[0xFF, 0xFE], Encoding::Utf16Le),
        (&[0xFE, 0xFF], Encoding::Utf16Be),
    ];

    marks.iter()
        .find(|(mark, _)| bytes.starts_with(mark))
        .map(|(_, encoding)| (*encoding, true))
        .unwrap_or((Encoding::Utf8, false))
}

/// Compression applied to a file, chosen by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain text
    None,
    /// `.gz`
    Gzip,
    /// `.bz2`
    Bzip2,
}

impl Compression {
    /// Pick the compression for `path` from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Compression::Gzip,
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Compression::Bzip2,
            _ => Compression::None,
        }
    }
}

/// Open a file for reading, decompressing `.gz` and `.bz2` files
///
/// The path `-` reads from stdin.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, stdin())));
    }

    let file = File::open(path)?;
    Ok(match Compression::from_path(path) {
        Compression::Gzip => Box::new(BufReader::with_capacity(BUFFER_SIZE, GzDecoder::new(file))),
        Compression::Bzip2 => Box::new(BufReader::with_capacity(
            BUFFER_SIZE,
            MultiBzDecoder::new(file),
        )),
        Compression::None => Box::new(BufReader::with_capacity(BUFFER_SIZE, file)),
    })
}

/// Output stream returned by [`create`]
///
/// Compressed streams are only complete after [`ArchiveWriter::finish`];
/// dropping the writer instead discards any trailer write error.
pub enum ArchiveWriter {
    /// Standard output
    Stdout(io::Stdout),
    /// Uncompressed file
    Plain(BufWriter<File>),
    /// Gzip-compressed file
    Gzip(BufWriter<GzEncoder<File>>),
    /// Bzip2-compressed file
    Bzip2(BufWriter<BzEncoder<File>>),
}

impl ArchiveWriter {
    /// Flush buffered data and write the compression trailer, if any
    pub fn finish(self) -> io::Result<()> {
        match self {
            ArchiveWriter::Stdout(mut out) => out.flush(),
            ArchiveWriter::Plain(writer) => {
                writer.into_inner().map_err(io::IntoInnerError::into_error)?;
                Ok(())
            }
            ArchiveWriter::Gzip(writer) => {
                let encoder = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
                encoder.finish()?;
                Ok(())
            }
            ArchiveWriter::Bzip2(writer) => {
                let encoder = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
                encoder.finish()?;
                Ok(())
            }
        }
    }
}

impl Write for ArchiveWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ArchiveWriter::Stdout(out) => out.write(buf),
            ArchiveWriter::Plain(writer) => writer.write(buf),
            ArchiveWriter::Gzip(writer) => writer.write(buf),
            ArchiveWriter::Bzip2(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ArchiveWriter::Stdout(out) => out.flush(),
            ArchiveWriter::Plain(writer) => writer.flush(),
            ArchiveWriter::Gzip(writer) => writer.flush(),
            ArchiveWriter::Bzip2(writer) => writer.flush(),
        }
    }
}

/// Create (truncate) a file for writing, compressing `.gz` and `.bz2` paths
///
/// The path `-` writes to stdout. Call [`ArchiveWriter::finish`] when done.
pub fn create<P: AsRef<Path>>(path: P) -> io::Result<ArchiveWriter> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return Ok(ArchiveWriter::Stdout(io::stdout()));
    }

    let file = File::create(path)?;
    Ok(match Compression::from_path(path) {
        Compression::Gzip => ArchiveWriter::Gzip(BufWriter::with_capacity(
            BUFFER_SIZE,
            GzEncoder::new(file, flate2::Compression::default()),
        )),
        Compression::Bzip2 => ArchiveWriter::Bzip2(BufWriter::with_capacity(
            BUFFER_SIZE,
            BzEncoder::new(file, bzip2::Compression::default()),
        )),
        Compression::None => ArchiveWriter::Plain(BufWriter::with_capacity(BUFFER_SIZE, file)),
    })
}

/// Write `bytes` to `path` through [`create`] and finish the stream
pub fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
    let mut writer = create(path)?;
    writer.write_all(bytes)?;
    writer.finish()
}

/// Read a whole archive file as UTF-8 text
///
/// A UTF-8 byte-order mark is stripped. Any other announced encoding, or
/// bytes that are not valid UTF-8, yield [`ArchiveError::Encoding`].
pub fn read_archive_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    open(path)
        .and_then(|mut reader| reader.read_to_end(&mut bytes))
        .map_err(|err| ArchiveError::io(path, err))?;

    decode_text(bytes).map_err(|msg| ArchiveError::Encoding(format!("{}: {}", path.display(), msg)))
}

fn decode_text(mut bytes: Vec<u8>) -> std::result::Result<String, String> {
    match detect_encoding(&bytes) {
        (Encoding::Utf8, has_bom) => {
            if has_bom {
                bytes.drain(..Encoding::Utf8.bom_len());
            }
            String::from_utf8(bytes).map_err(|err| format!("invalid UTF-8 ({})", err.utf8_error()))
        }
        (other, _) => Err(format!("unsupported text encoding {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "--- Start Archive Service ---").unwrap();
        writeln!(file, "Entry: 1").unwrap();
        file.flush().unwrap();

        let reader = open(file.path()).unwrap();
        let lines: Vec<String> = reader.lines().collect::<io::Result<Vec<_>>>().unwrap();
        assert_eq!(lines, vec!["--- Start Archive Service ---", "Entry: 1"]);
    }

    #[test]
    fn test_gzip_round_trip_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt.GZ");
        let mut writer = create(&path).unwrap();
        writer.write_all(b"Service: Packed\n").unwrap();
        writer.finish().unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        assert_eq!(read_archive_text(&path).unwrap(), "Service: Packed\n");
    }

    #[test]
    fn test_bzip2_round_trip_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt.Bz2");
        write_file(&path, "Service: Packed ✓\n".as_bytes()).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..3], b"BZh");

        assert_eq!(read_archive_text(&path).unwrap(), "Service: Packed ✓\n");
    }

    #[test]
    fn test_finished_gzip_stream_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt.gz");
        let text = "Entry: 1\n".repeat(10_000);
        write_file(&path, text.as_bytes()).unwrap();

        // The trailer holds the uncompressed length modulo 2^32
        let raw = std::fs::read(&path).unwrap();
        let size = u32::from_le_bytes(raw[raw.len() - 4..].try_into().unwrap());
        assert_eq!(size as usize, text.len());
        assert_eq!(read_archive_text(&path).unwrap(), text);
    }

    #[test]
    fn test_compression_from_path() {
        assert_eq!(Compression::from_path(Path::new("a.txt")), Compression::None);
        assert_eq!(Compression::from_path(Path::new("a.json.gz")), Compression::Gzip);
        assert_eq!(Compression::from_path(Path::new("a.BZ2")), Compression::Bzip2);
        assert_eq!(Compression::from_path(Path::new("gz")), Compression::None);
    }

    #[test]
    fn test_detect_encoding_precedence() {
        assert_eq!(detect_encoding(b"plain"), (Encoding::Utf8, false));
        assert_eq!(detect_encoding(&[0xEF, 0xBB, 0xBF, b'a']), (Encoding::Utf8, true));
        assert_eq!(detect_encoding(&[0xFF, 0xFE, b'a', 0]), (Encoding::Utf16Le, true));
        assert_eq!(detect_encoding(&[0xFF, 0xFE, 0, 0]), (Encoding::Utf32Le, true));
        assert_eq!(detect_encoding(&[0, 0, 0xFE, 0xFF]), (Encoding::Utf32Be, true));
        assert_eq!(detect_encoding(b"+/v8abc"), (Encoding::Utf7, true));
        assert_eq!(detect_encoding(&[0x0E, 0xFE, 0xFF]), (Encoding::Scsu, true));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        file.write_all("Name: Zoë".as_bytes()).unwrap();
        file.flush().unwrap();

        assert_eq!(read_archive_text(file.path()).unwrap(), "Name: Zoë");
    }

    #[test]
    fn test_other_encodings_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'E', 0]).unwrap();
        file.flush().unwrap();

        let err = read_archive_text(file.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::Encoding(_)));
        assert!(err.to_string().contains("UTF-16LE"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_archive_text("/nonexistent/board.txt").unwrap_err();
        assert!(matches!(err, ArchiveError::Io { .. }));
    }
}
