//! chm_mph — CHM (Czech–Havas–Majewski) minimal perfect hashing.
//!
//! - Keys become edges of a random 2/3-uniform hypergraph over a larger
//!   vertex space; peeling the graph yields an order in which per-vertex
//!   values can be assigned so that `f(key_i) = (Σ g[vertices of edge i]) % n == i`.
//! - Within-edge hash collisions are "fudged" deterministically and the
//!   lookup formula replays the recorded fudge rules bit-for-bit.
//! - Robust: if an attempt hits a collision or a non-peelable core, we rehash
//!   with another salt.

mod assign;
mod builder;
pub mod codegen;
mod error;
mod graph;
mod hash;
mod peel;
mod util;

pub use assign::GTable;
pub use builder::{BuildConfig, Builder, Mphf};
pub use error::ChmError;
pub use hash::{EdgeHasher, WyEdgeHasher, Xxh3EdgeHasher};
