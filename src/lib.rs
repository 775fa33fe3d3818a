//! # sgindex: a succinct index for bidirected sequence graphs
//!
//! This crate builds a static, succinctly-encoded index for a bidirected
//! sequence graph: nodes carry DNA labels, edges connect node sides, and both
//! strands of every node are first-class citizens. On top of the graph the
//! index stores an arbitrary collection of named paths (reference walks) and
//! a collection of haplotype threads encoded with a graph-extended positional
//! Burrows-Wheeler transform (gPBWT).
//!
//! The index is built once from graph chunks and is immutable afterwards.
//! All queries are pure functions of the baked structures and can be shared
//! freely between threads.
//!
//! # References
//!
//! ### PBWT
//!
//! Richard Durbin: **Efficient haplotype matching and storage using the positional Burrows-Wheeler transform (PBWT)**.\
//! Bioinformatics 30(9):1266-1272, 2014.
//! DOI: [10.1093/bioinformatics/btu014](https://doi.org/10.1093/bioinformatics/btu014)
//!
//! ### gPBWT
//!
//! Adam M. Novak, Erik Garrison, and Benedict Paten: **A graph extension of the positional Burrows-Wheeler transform and its applications**.\
//! Algorithms for Molecular Biology 12:18, 2017.
//! DOI: [10.1186/s13015-017-0109-9](https://doi.org/10.1186/s13015-017-0109-9)
//!
//! # Notes
//!
//! * The succinct building blocks come from [Simple-SDS](https://github.com/jltsiren/simple-sds);
//!   see that crate for assumptions on the environment.
//! * The serialized format is a flat concatenation of the components with no
//!   magic header. It is defined by this crate and the Simple-SDS structures
//!   it uses; portability to other implementations is not a goal.

pub mod builder;
pub mod formats;
pub mod graph;
pub mod index;
pub mod paths;
pub mod support;
pub mod threads;

//-----------------------------------------------------------------------------

pub use crate::builder::{BuildParameters, GraphBuilder, GraphChunk};
pub use crate::graph::{Edge, Graph};
pub use crate::index::GraphIndex;
pub use crate::paths::Traversal;
pub use crate::support::Orientation;
pub use crate::threads::{ThreadIndex, ThreadMapping, ThreadSearchState};
