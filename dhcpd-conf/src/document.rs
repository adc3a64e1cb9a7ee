use std::fmt::{self, Display, Formatter};
use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::record::{normalize_mac, Reservation};
use crate::scanner::{scan_blocks, HostBlock};

/// One piece of a configuration file in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text that is not part of any host block.
    Raw(&'a str),
    /// A host block and its exact source text.
    Host(&'a HostBlock, &'a str),
}

/// Configuration text split into raw regions and host blocks by one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument<'a> {
    text: &'a str,
    blocks: Vec<HostBlock>,
}

impl<'a> ConfigDocument<'a> {
    /// Scan `text` for host blocks.
    pub fn parse(text: &'a str) -> Self {
        Self {
            text,
            blocks: scan_blocks(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn blocks(&self) -> &[HostBlock] {
        &self.blocks
    }

    /// Raw and host segments whose concatenation is the original text.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut out = Vec::with_capacity(self.blocks.len() * 2 + 1);
        let mut cursor = 0;
        for block in &self.blocks {
            if block.span.start > cursor {
                out.push(Segment::Raw(&self.text[cursor..block.span.start]));
            }
            out.push(Segment::Host(block, &self.text[block.span.clone()]));
            cursor = block.span.end;
        }
        if cursor < self.text.len() {
            out.push(Segment::Raw(&self.text[cursor..]));
        }
        out
    }

    /// First block whose header name equals `fqdn` exactly.
    pub fn block_for_host(&self, fqdn: &str) -> Option<&HostBlock> {
        self.blocks.iter().find(|block| block.fqdn == fqdn)
    }

    /// First complete block bound to `mac`.
    pub fn block_for_mac(&self, mac: &str) -> Option<&HostBlock> {
        let wanted = normalize_mac(mac)?;
        self.blocks.iter().find(|block| {
            block
                .reservation()
                .is_some_and(|reservation| reservation.mac == wanted)
        })
    }

    /// Reservation of [`Self::block_for_mac`].
    pub fn reservation_for_mac(&self, mac: &str) -> Option<Reservation> {
        self.block_for_mac(mac).and_then(HostBlock::reservation)
    }

    /// Every complete block; blocks missing either statement are skipped.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.blocks.iter().filter_map(HostBlock::reservation).collect()
    }
}

impl Display for ConfigDocument<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            match segment {
                Segment::Raw(text) | Segment::Host(_, text) => f.write_str(text)?,
            }
        }
        Ok(())
    }
}

/// Byte range of the block for `fqdn`, if any.
pub fn find_reservation_block(text: &str, fqdn: &str) -> Option<Range<usize>> {
    ConfigDocument::parse(text)
        .block_for_host(fqdn)
        .map(|block| block.span.clone())
}

/// First reservation bound to `mac` in document order.
pub fn find_reservation_by_mac(text: &str, mac: &str) -> Option<Reservation> {
    ConfigDocument::parse(text).reservation_for_mac(mac)
}

/// All complete reservations in document order.
pub fn extract_all_reservations(text: &str) -> Vec<Reservation> {
    ConfigDocument::parse(text).reservations()
}

/// Read a configuration file into memory.
pub fn read_file(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
}
