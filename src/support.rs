//! Support structures for the graph index.
//!
//! This module provides the pieces that the succinct library does not:
//! orientation handling, the 3-bit DNA coding used by the sequence vector,
//! a binary [`WaveletTree`] for rank/select over integer alphabets, and a
//! small FM-index ([`NameCsa`]) over the concatenated path name store.

use simple_sds::bit_vector::BitVector;
use simple_sds::int_vector::IntVector;
use simple_sds::ops::{Access, BitVec, Push, Rank, Select, SelectZero, Vector};
use simple_sds::raw_vector::{PushRaw, RawVector};
use simple_sds::serialize::Serialize;
use simple_sds::bits;

use std::io::{Error, ErrorKind};
use std::ops::Range;
use std::io;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Orientation of a node visit.
///
/// A bidirected graph can be traversed along either strand of a node.
/// [`Orientation::Forward`] reads the label as stored, while
/// [`Orientation::Reverse`] reads the reverse complement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Orientation {
    /// Forward strand.
    #[default]
    Forward,
    /// Reverse complement strand.
    Reverse,
}

impl Orientation {
    /// Returns the opposite orientation.
    #[inline]
    pub fn flip(self) -> Orientation {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }

    /// Returns `true` if this is the reverse orientation.
    #[inline]
    pub fn is_reverse(self) -> bool {
        self == Orientation::Reverse
    }

    /// Converts a reverse flag into an orientation.
    #[inline]
    pub fn from_is_reverse(is_reverse: bool) -> Orientation {
        if is_reverse { Orientation::Reverse } else { Orientation::Forward }
    }
}

//-----------------------------------------------------------------------------

/// Width of a packed DNA symbol in bits.
pub const BASE_WIDTH: usize = 3;

/// Returns the packed code for a DNA symbol.
///
/// The coding maps `A`, `T`, `C`, `G` to `0..4`; everything else becomes the
/// code for `N`.
#[inline]
pub fn encode_base(c: u8) -> u64 {
    match c {
        b'A' => 0,
        b'T' => 1,
        b'C' => 2,
        b'G' => 3,
        _ => 4,
    }
}

/// Returns the DNA symbol for a packed code.
#[inline]
pub fn decode_base(code: u64) -> u8 {
    match code {
        0 => b'A',
        1 => b'T',
        2 => b'C',
        3 => b'G',
        _ => b'N',
    }
}

/// Returns the complement of a DNA symbol.
///
/// The path name markers `#` and `$` map to each other so that marked
/// sequences stay marked under reverse complementation.
#[inline]
pub fn complement(c: u8) -> u8 {
    match c {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'#' => b'$',
        b'$' => b'#',
        _ => b'N',
    }
}

/// Returns the reverse complement of a DNA sequence.
///
/// # Examples
///
/// ```
/// use sgindex::support;
///
/// assert_eq!(support::reverse_complement(b"ACGT"), b"ACGT");
/// assert_eq!(support::reverse_complement(b"AAC"), b"GTT");
/// ```
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|c| complement(*c)).collect()
}

//-----------------------------------------------------------------------------

/// An immutable sequence of unsigned integers with rank and select support.
///
/// The sequence is stored as a binary wavelet tree with one bitvector level
/// per bit of the value width. The alphabet is `0..2^width`, where the width
/// is determined by the largest value in the source; no symbol remapping is
/// done. Access, rank, and select all run in O(width) bitvector operations.
///
/// # Examples
///
/// ```
/// use sgindex::support::WaveletTree;
///
/// let tree = WaveletTree::from(vec![2, 0, 1, 2, 2, 0]);
/// assert_eq!(tree.len(), 6);
/// assert_eq!(tree.get(3), 2);
/// assert_eq!(tree.rank(4, 2), 2);
/// assert_eq!(tree.select(2, 2), Some(4));
/// assert_eq!(tree.count(0), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveletTree {
    len: usize,
    width: usize,
    levels: Vec<BitVector>,
}

impl WaveletTree {
    /// Returns the number of values in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the width of the alphabet in bits.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    // Returns `true` if the value fits into the alphabet.
    #[inline]
    fn in_alphabet(&self, value: u64) -> bool {
        self.width >= 64 || value < (1u64 << self.width)
    }

    /// Returns the value at the given position.
    ///
    /// # Panics
    ///
    /// May panic if `index >= self.len()`.
    pub fn get(&self, index: usize) -> u64 {
        let mut pos = index;
        let mut value = 0;
        for bits in self.levels.iter() {
            value <<= 1;
            if bits.get(pos) {
                value |= 1;
                pos = Self::zeros(bits) + bits.rank(pos);
            } else {
                pos -= bits.rank(pos);
            }
        }
        value
    }

    /// Returns the number of occurrences of `value` in the prefix `0..index`.
    ///
    /// Returns `0` if the value is not in the alphabet. The index may be past
    /// the end of the sequence.
    pub fn rank(&self, index: usize, value: u64) -> usize {
        if self.is_empty() || !self.in_alphabet(value) {
            return 0;
        }
        let mut low = 0;
        let mut high = index.min(self.len);
        for (level, bits) in self.levels.iter().enumerate() {
            if Self::level_bit(self.width, level, value) {
                let zeros = Self::zeros(bits);
                low = zeros + bits.rank(low);
                high = zeros + bits.rank(high);
            } else {
                low -= bits.rank(low);
                high -= bits.rank(high);
            }
        }
        high - low
    }

    /// Returns the position of the occurrence of rank `rank` of `value`.
    ///
    /// Ranks are 0-based. Returns [`None`] if there is no such occurrence.
    pub fn select(&self, rank: usize, value: u64) -> Option<usize> {
        if self.is_empty() || !self.in_alphabet(value) {
            return None;
        }

        // Determine the interval of the value at the leaf level.
        let mut low = 0;
        let mut high = self.len;
        for (level, bits) in self.levels.iter().enumerate() {
            if Self::level_bit(self.width, level, value) {
                let zeros = Self::zeros(bits);
                low = zeros + bits.rank(low);
                high = zeros + bits.rank(high);
            } else {
                low -= bits.rank(low);
                high -= bits.rank(high);
            }
        }
        if rank >= high - low {
            return None;
        }

        // Walk back up, mapping the leaf position to the root.
        let mut pos = low + rank;
        for (level, bits) in self.levels.iter().enumerate().rev() {
            if Self::level_bit(self.width, level, value) {
                pos = bits.select(pos - Self::zeros(bits))?;
            } else {
                pos = bits.select_zero(pos)?;
            }
        }
        Some(pos)
    }

    /// Returns the total number of occurrences of `value`.
    pub fn count(&self, value: u64) -> usize {
        self.rank(self.len, value)
    }

    // The bit of `value` examined at the given level.
    #[inline]
    fn level_bit(width: usize, level: usize, value: u64) -> bool {
        (value >> (width - 1 - level)) & 1 == 1
    }

    // The number of unset bits in a level.
    #[inline]
    fn zeros(bits: &BitVector) -> usize {
        bits.len() - bits.count_ones()
    }

    fn enable_support(bits: &mut BitVector) {
        bits.enable_rank();
        bits.enable_select();
        bits.enable_select_zero();
    }
}

impl From<Vec<u64>> for WaveletTree {
    fn from(source: Vec<u64>) -> Self {
        let max_value = source.iter().copied().max().unwrap_or(0);
        let width = bits::bit_len(max_value);
        let len = source.len();

        let mut levels: Vec<BitVector> = Vec::with_capacity(width);
        let mut current = source;
        for level in 0..width {
            let mut raw = RawVector::with_capacity(len);
            for value in current.iter() {
                raw.push_bit(Self::level_bit(width, level, *value));
            }
            let mut bits = BitVector::from(raw);
            Self::enable_support(&mut bits);
            levels.push(bits);

            // Stable partition by the current bit for the next level.
            if level + 1 < width {
                let mut reordered: Vec<u64> = Vec::with_capacity(len);
                reordered.extend(current.iter().filter(|v| !Self::level_bit(width, level, **v)));
                reordered.extend(current.iter().filter(|v| Self::level_bit(width, level, **v)));
                current = reordered;
            }
        }

        WaveletTree {
            len: len,
            width: width,
            levels: levels,
        }
    }
}

impl Serialize for WaveletTree {
    fn serialize_header<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.len.serialize(writer)?;
        self.width.serialize(writer)?;
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        for bits in self.levels.iter() {
            bits.serialize(writer)?;
        }
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let len = usize::load(reader)?;
        let width = usize::load(reader)?;
        if width == 0 || width > 64 {
            return Err(Error::new(ErrorKind::InvalidData, "WaveletTree: Invalid alphabet width"));
        }
        let mut levels: Vec<BitVector> = Vec::with_capacity(width);
        for _ in 0..width {
            let mut bits = BitVector::load(reader)?;
            if bits.len() != len {
                return Err(Error::new(ErrorKind::InvalidData, "WaveletTree: Level length mismatch"));
            }
            Self::enable_support(&mut bits);
            levels.push(bits);
        }
        Ok(WaveletTree {
            len: len,
            width: width,
            levels: levels,
        })
    }

    fn size_in_elements(&self) -> usize {
        let mut result = self.len.size_in_elements() + self.width.size_in_elements();
        for bits in self.levels.iter() {
            result += bits.size_in_elements();
        }
        result
    }
}

//-----------------------------------------------------------------------------

/// A full-text index over a byte store.
///
/// `NameCsa` stores the suffix array and the Burrows-Wheeler transform of the
/// text (with an implicit smallest terminator), which is enough to count and
/// locate all occurrences of a pattern with backward search. It indexes the
/// concatenated `#name$` path name store, where the markers make every name
/// lookup an exact-string query.
///
/// The text itself is not retained; the caller keeps the plain byte store.
///
/// # Examples
///
/// ```
/// use sgindex::support::NameCsa;
///
/// let csa = NameCsa::new(b"#one$#two$#three$");
/// assert_eq!(csa.count(b"#two$"), 1);
/// assert_eq!(csa.locate(b"#t"), vec![5, 10]);
/// assert_eq!(csa.count(b"#four$"), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameCsa {
    // Suffix array over the text plus the terminator.
    suffixes: IntVector,
    // BWT of the text; the terminator is stored as symbol 0.
    bwt: WaveletTree,
    // counts[c] is the number of symbols in the text (and terminator) smaller than c.
    counts: Vec<usize>,
}

impl NameCsa {
    const ALPHABET: usize = 256;

    /// Builds an index for the given text.
    ///
    /// The text must not contain zero bytes; they are reserved for the
    /// terminator.
    pub fn new(text: &[u8]) -> NameCsa {
        let n = text.len();

        // Sort the suffixes, with the empty suffix (the terminator) first.
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_unstable_by(|a, b| text[*a..].cmp(&text[*b..]));

        let mut suffixes = IntVector::with_capacity(n + 1, bits::bit_len(n as u64)).unwrap();
        let mut bwt: Vec<u64> = Vec::with_capacity(n + 1);
        for suffix in order.iter() {
            suffixes.push(*suffix as u64);
            bwt.push(if *suffix == 0 { 0 } else { text[*suffix - 1] as u64 });
        }

        let mut counts: Vec<usize> = vec![0; Self::ALPHABET];
        for c in text.iter() {
            counts[*c as usize] += 1;
        }
        let mut cumulative = 1; // the terminator is smaller than everything
        for c in 0..Self::ALPHABET {
            let occurrences = counts[c];
            counts[c] = cumulative;
            cumulative += occurrences;
        }

        NameCsa {
            suffixes: suffixes,
            bwt: WaveletTree::from(bwt),
            counts: counts,
        }
    }

    /// Returns the length of the indexed text.
    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len() - 1
    }

    /// Returns `true` if the indexed text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the interval of suffixes starting with the pattern.
    pub fn find(&self, pattern: &[u8]) -> Range<usize> {
        let mut range = 0..self.bwt.len();
        for c in pattern.iter().rev() {
            if range.is_empty() {
                break;
            }
            let offset = self.counts[*c as usize];
            range = (offset + self.bwt.rank(range.start, *c as u64))
                ..(offset + self.bwt.rank(range.end, *c as u64));
        }
        range
    }

    /// Returns the number of occurrences of the pattern in the text.
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.find(pattern).len()
    }

    /// Returns the sorted starting positions of all occurrences of the pattern.
    pub fn locate(&self, pattern: &[u8]) -> Vec<usize> {
        let range = self.find(pattern);
        let mut result: Vec<usize> = range.map(|i| self.suffixes.get(i) as usize).collect();
        result.sort_unstable();
        result
    }
}

impl Serialize for NameCsa {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.suffixes.serialize(writer)?;
        self.bwt.serialize(writer)?;
        self.counts.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let suffixes = IntVector::load(reader)?;
        let bwt = WaveletTree::load(reader)?;
        let counts = Vec::<usize>::load(reader)?;
        if suffixes.len() != bwt.len() {
            return Err(Error::new(ErrorKind::InvalidData, "NameCsa: Suffix array / BWT length mismatch"));
        }
        if counts.len() != Self::ALPHABET {
            return Err(Error::new(ErrorKind::InvalidData, "NameCsa: Invalid alphabet size"));
        }
        Ok(NameCsa {
            suffixes: suffixes,
            bwt: bwt,
            counts: counts,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.suffixes.size_in_elements() + self.bwt.size_in_elements() + self.counts.size_in_elements()
    }
}

//-----------------------------------------------------------------------------
