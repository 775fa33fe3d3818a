//! Text output and string parsing for the command line surface.
//!
//! The dump is a GFA-like tab-separated format: an `H` header, an `S` record
//! per node, a `P` record per path visit, and an `L` record per edge, with
//! `+`/`-` marking sides and strands. The parsers cover the two string forms
//! used on the command line: regions (`name[:start[-end]]`) and graph
//! positions (`id:off[:len]`, with `-` before the offset selecting the
//! reverse strand).

use crate::index::GraphIndex;
use crate::support::Orientation;

use std::io::Write;
use std::io;


//-----------------------------------------------------------------------------

/// Writes the index as GFA-like text.
pub fn write_text<W: Write>(index: &GraphIndex, out: &mut W) -> io::Result<()> {
    let graph = index.graph();
    writeln!(out, "H\tVN:Z:1.0")?;
    for rank in 1..=graph.max_node_rank() {
        let id = graph.rank_to_id(rank);
        out.write_all(b"S\t")?;
        write!(out, "{}\t", id)?;
        out.write_all(&graph.node_sequence(id))?;
        out.write_all(b"\n")?;
    }
    for path_rank in 1..=index.paths().max_path_rank() {
        let name = String::from_utf8_lossy(index.paths().path_name(path_rank)).into_owned();
        for traversal in index.paths().path(path_rank) {
            writeln!(out, "P\t{}\t{}\t{}\t{}",
                traversal.id, name, traversal.rank,
                if traversal.orientation.is_reverse() { "-" } else { "+" })?;
        }
    }
    for rank in 1..=graph.max_node_rank() {
        let id = graph.rank_to_id(rank);
        for edge in graph.edges_from(id) {
            writeln!(out, "L\t{}\t{}\t{}\t{}",
                edge.from, if edge.from_start { "-" } else { "+" },
                edge.to, if edge.to_end { "-" } else { "+" })?;
        }
    }
    Ok(())
}

//-----------------------------------------------------------------------------

/// A parsed region string: a path name with an optional base-pair interval.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Name of the path.
    pub name: String,
    /// The closed interval `(start, end)`, if one was given. A bare
    /// `name:start` becomes `(start, start)`.
    pub interval: Option<(usize, usize)>,
}

/// Parses a region of the form `name[:start[-end]]`.
///
/// # Examples
///
/// ```
/// use sgindex::formats::{self, Region};
///
/// assert_eq!(formats::parse_region("chr1").unwrap(),
///     Region { name: String::from("chr1"), interval: None });
/// assert_eq!(formats::parse_region("chr1:100-200").unwrap(),
///     Region { name: String::from("chr1"), interval: Some((100, 200)) });
/// ```
pub fn parse_region(target: &str) -> Result<Region, String> {
    let (name, range) = match target.find(':') {
        Some(colon) => (&target[..colon], Some(&target[colon + 1..])),
        None => (target, None),
    };
    if name.is_empty() {
        return Err(format!("Region {} has an empty path name", target));
    }
    let interval = match range {
        None => None,
        Some(range) => {
            let (start, end) = match range.find('-') {
                Some(dash) => (&range[..dash], &range[dash + 1..]),
                None => (range, range),
            };
            let start = start.parse::<usize>().map_err(|_| format!("Invalid region start in {}", target))?;
            let end = end.parse::<usize>().map_err(|_| format!("Invalid region end in {}", target))?;
            if end < start {
                return Err(format!("Region {} ends before it starts", target));
            }
            Some((start, end))
        }
    };
    Ok(Region {
        name: String::from(name),
        interval: interval,
    })
}

//-----------------------------------------------------------------------------

/// Parses a graph position of the form `id:off`, where `id:-off` denotes the
/// reverse strand.
///
/// # Examples
///
/// ```
/// use sgindex::{formats, Orientation};
///
/// assert_eq!(formats::parse_position("12:4").unwrap(), (12, Orientation::Forward, 4));
/// assert_eq!(formats::parse_position("12:-4").unwrap(), (12, Orientation::Reverse, 4));
/// ```
pub fn parse_position(position: &str) -> Result<(i64, Orientation, usize), String> {
    let mut fields = position.split(':');
    let id = parse_node_id(fields.next(), position)?;
    let (orientation, offset) = parse_offset(fields.next(), position)?;
    if fields.next().is_some() {
        return Err(format!("Trailing fields in position {}", position));
    }
    Ok((id, orientation, offset))
}

/// Parses a graph substring of the form `id:off:len`, where `id:-off:len`
/// denotes `len` bases starting at offset `off` on the reverse strand.
///
/// # Examples
///
/// ```
/// use sgindex::{formats, Orientation};
///
/// assert_eq!(formats::parse_position_substr("7:-5:10").unwrap(),
///     (7, Orientation::Reverse, 5, 10));
/// ```
pub fn parse_position_substr(position: &str) -> Result<(i64, Orientation, usize, usize), String> {
    let mut fields = position.split(':');
    let id = parse_node_id(fields.next(), position)?;
    let (orientation, offset) = parse_offset(fields.next(), position)?;
    let len = match fields.next() {
        Some(field) => field.parse::<usize>().map_err(|_| format!("Invalid length in position {}", position))?,
        None => return Err(format!("Position {} has no length", position)),
    };
    if fields.next().is_some() {
        return Err(format!("Trailing fields in position {}", position));
    }
    Ok((id, orientation, offset, len))
}

fn parse_node_id(field: Option<&str>, position: &str) -> Result<i64, String> {
    match field {
        Some(field) => field.parse::<i64>().map_err(|_| format!("Invalid node id in position {}", position)),
        None => Err(format!("Position {} has no node id", position)),
    }
}

fn parse_offset(field: Option<&str>, position: &str) -> Result<(Orientation, usize), String> {
    let field = match field {
        Some(field) => field,
        None => return Err(format!("Position {} has no offset", position)),
    };
    let (orientation, digits) = match field.strip_prefix('-') {
        Some(rest) => (Orientation::Reverse, rest),
        None => (Orientation::Forward, field),
    };
    let offset = digits.parse::<usize>().map_err(|_| format!("Invalid offset in position {}", position))?;
    Ok((orientation, offset))
}

//-----------------------------------------------------------------------------
