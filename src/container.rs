//! Container parser: reads the six PCMP regions in strict order,
//! enforcing resource caps before any length-driven allocation. Returns
//! a structured record without interpreting payload contents.

use crate::config::VerifyConfig;
use crate::errors;
use crate::io::ReadBuffer;
use crate::predict::Order;
use crate::Result;

const MAGIC: &[u8; 4] = b"PCMP";
const FOOTER_MAGIC: u32 = 0x5043_4D50;
const FORMAT_VERSION: u8 = 1;

#[derive(Clone, Copy, Debug)]
pub struct Header {
    pub order: Order,
    pub n: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct Metadata {
    pub proof_type: u64,
    pub total_n: u64,
    pub chunk_bytes: u64,
    pub num_chunks: u64,
    pub ordering_mode: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Footer {
    pub magic: u32,
    pub version: u32,
}

/// The parser's output: every region of the file, with the two
/// compressed payloads still in their on-wire, undecompressed form.
pub struct ParsedFile {
    pub header: Header,
    pub residual_block: Vec<u8>,
    pub permutation_block: Vec<u8>,
    pub metadata: Metadata,
    pub stored_root: [u8; 32],
    pub footer: Footer,
}

/// Parses a PCMP byte stream read through `reader`, per spec.md §3 and
/// §4.6. Any short read, bad magic/version, or oversize length is
/// `Error::Malformed` before the oversize region is read.
pub fn parse<R: ReadBuffer>(reader: &mut R, cfg: &VerifyConfig) -> Result<ParsedFile> {
    let header = read_header(reader, cfg)?;
    tracing::debug!(n = header.n, order = header.order.as_u8(), "parsed header");

    let residual_block = read_length_prefixed_block(reader, cfg, "residual")?;
    let permutation_block = read_length_prefixed_block(reader, cfg, "permutation")?;
    let metadata = read_metadata(reader)?;
    let stored_root = read_root(reader)?;
    let footer = read_footer(reader)?;

    Ok(ParsedFile {
        header,
        residual_block,
        permutation_block,
        metadata,
        stored_root,
        footer,
    })
}

fn read_header<R: ReadBuffer>(reader: &mut R, cfg: &VerifyConfig) -> Result<Header> {
    let magic = reader.read_bytes(4)?;
    if magic.as_slice() != MAGIC {
        return errors::malformed("bad header magic");
    }

    let version = reader.read_u8()?;
    if version != FORMAT_VERSION {
        return errors::malformed("unsupported format version");
    }

    let order_byte = reader.read_u8()?;
    let order = Order::from_byte(order_byte)?;

    // Two reserved bytes, unused but present on the wire.
    let _reserved = reader.read_bytes(2)?;

    let n = reader.read_le_u64()?;
    if n > cfg.max_elements {
        return errors::malformed("element count exceeds cap");
    }

    Ok(Header { order, n })
}

fn read_length_prefixed_block<R: ReadBuffer>(
    reader: &mut R,
    cfg: &VerifyConfig,
    name: &'static str,
) -> Result<Vec<u8>> {
    let len = reader.read_le_u64()?;
    if len > cfg.max_compressed_bytes {
        tracing::warn!(name, len, "compressed block exceeds cap");
        return errors::malformed("compressed block exceeds cap");
    }
    match reader.read_bytes(len as usize) {
        Ok(bytes) => Ok(bytes),
        Err(_) => errors::malformed("short read of compressed block"),
    }
}

fn read_metadata<R: ReadBuffer>(reader: &mut R) -> Result<Metadata> {
    Ok(Metadata {
        proof_type: reader.read_le_u64()?,
        total_n: reader.read_le_u64()?,
        chunk_bytes: reader.read_le_u64()?,
        num_chunks: reader.read_le_u64()?,
        ordering_mode: reader.read_le_u32()?,
    })
}

fn read_root<R: ReadBuffer>(reader: &mut R) -> Result<[u8; 32]> {
    let bytes = reader.read_bytes(32)?;
    let mut root = [0u8; 32];
    root.copy_from_slice(&bytes);
    Ok(root)
}

fn read_footer<R: ReadBuffer>(reader: &mut R) -> Result<Footer> {
    Ok(Footer {
        magic: reader.read_le_u32()?,
        version: reader.read_le_u32()?,
    })
}

/// The footer magic value a well-formed file must carry, per spec.md §9's
/// resolved Open Question: the footer magic is required to equal the
/// header magic (both spell "PCMP"), read little-endian as `0x50434D50`.
pub const EXPECTED_FOOTER_MAGIC: u32 = FOOTER_MAGIC;
