use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

/// Archive signature at offset 0.
pub const SIGNATURE: &[u8; 4] = b".spk";

/// The only format version, used by both the archive and entry headers.
pub const FORMAT_VERSION: u16 = 1;

/// Encoded size of [`ArchiveHeader`].
pub const ARCHIVE_HEADER_SIZE: usize = 16;

/// Encoded size of [`EntryHeader`], not counting the filename that follows it.
pub const ENTRY_HEADER_SIZE: usize = 16;

fn ensure_len(data: &[u8], needed: usize) -> Result<(), FormatError> {
    if data.len() < needed {
        return Err(FormatError::Truncated {
            needed,
            available: data.len(),
        });
    }
    Ok(())
}

/// Archive header - 16 bytes at offset 0
///
/// | offset | size | field        |
/// |--------|------|--------------|
/// | 0      | 4    | signature    |
/// | 4      | 2    | version      |
/// | 6      | 4    | num_files    |
/// | 10     | 4    | index_offset |
/// | 14     | 2    | reserved     |
///
/// All integers are little-endian. The reserved bytes are written as zero
/// and ignored on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveHeader {
    pub num_files: u32,
    pub index_offset: u32,
}

impl ArchiveHeader {
    pub fn new(num_files: u32, index_offset: u32) -> Self {
        Self {
            num_files,
            index_offset,
        }
    }

    /// Decode and validate a header from the start of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        ensure_len(data, ARCHIVE_HEADER_SIZE)?;

        let signature = [data[0], data[1], data[2], data[3]];
        if &signature != SIGNATURE {
            return Err(FormatError::BadSignature(signature));
        }

        let version = LittleEndian::read_u16(&data[4..6]);
        if version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        Ok(Self {
            num_files: LittleEndian::read_u32(&data[6..10]),
            index_offset: LittleEndian::read_u32(&data[10..14]),
        })
    }

    pub fn to_bytes(&self) -> [u8; ARCHIVE_HEADER_SIZE] {
        let mut buf = [0u8; ARCHIVE_HEADER_SIZE];
        buf[0..4].copy_from_slice(SIGNATURE);
        LittleEndian::write_u16(&mut buf[4..6], FORMAT_VERSION);
        LittleEndian::write_u32(&mut buf[6..10], self.num_files);
        LittleEndian::write_u32(&mut buf[10..14], self.index_offset);
        buf
    }
}

/// Entry header - 16 bytes, followed by `filename_size` bytes of name
///
/// | offset | size | field         |
/// |--------|------|---------------|
/// | 0      | 2    | version       |
/// | 2      | 2    | filename_size |
/// | 4      | 4    | offset        |
/// | 8      | 4    | file_size     |
/// | 12     | 4    | compress_size |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    /// Filename length including the trailing NUL.
    pub filename_size: u16,
    /// Absolute offset of the compressed payload.
    pub offset: u32,
    pub file_size: u32,
    pub compress_size: u32,
}

impl EntryHeader {
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        ensure_len(data, ENTRY_HEADER_SIZE)?;

        let version = LittleEndian::read_u16(&data[0..2]);
        if version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        Ok(Self {
            filename_size: LittleEndian::read_u16(&data[2..4]),
            offset: LittleEndian::read_u32(&data[4..8]),
            file_size: LittleEndian::read_u32(&data[8..12]),
            compress_size: LittleEndian::read_u32(&data[12..16]),
        })
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_HEADER_SIZE] {
        let mut buf = [0u8; ENTRY_HEADER_SIZE];
        LittleEndian::write_u16(&mut buf[0..2], FORMAT_VERSION);
        LittleEndian::write_u16(&mut buf[2..4], self.filename_size);
        LittleEndian::write_u32(&mut buf[4..8], self.offset);
        LittleEndian::write_u32(&mut buf[8..12], self.file_size);
        LittleEndian::write_u32(&mut buf[12..16], self.compress_size);
        buf
    }

    /// Bytes this entry occupies in the index region.
    pub fn index_len(&self) -> u64 {
        ENTRY_HEADER_SIZE as u64 + self.filename_size as u64
    }

    /// Byte range of the compressed payload.
    pub fn payload_range(&self) -> (u64, u64) {
        let start = self.offset as u64;
        (start, start + self.compress_size as u64)
    }
}

/// Decode a stored filename, dropping the NUL padding.
pub fn decode_filename(raw: &[u8]) -> Result<String, std::string::FromUtf8Error> {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8(raw[..end].to_vec())
}

/// Parsed SPK entry: header plus its decoded filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpkFileEntry {
    pub file_name: String,
    pub header: EntryHeader,
}

impl SpkFileEntry {
    pub fn file_size(&self) -> u64 {
        self.header.file_size as u64
    }

    pub fn compressed_size(&self) -> u64 {
        self.header.compress_size as u64
    }

    pub fn offset(&self) -> u64 {
        self.header.offset as u64
    }
}
