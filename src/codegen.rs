//! Renders a built [`Mphf`] as Rust source text: the g table, a standalone
//! lookup function reproducing the construction formula bit-for-bit
//! (including fudge-rule replay), and the optional identity-map artifact.
//!
//! The emitted lookup function targets the default [`WyEdgeHasher`] and
//! depends only on the `wyhash` crate.

use crate::builder::Mphf;
use crate::graph::{FUDGE_01, FUDGE_02, FUDGE_12};
use crate::hash::{EdgeHasher, LANE0_XOR, LANE1_ADD, LANE2_XOR, WyEdgeHasher};

const VALUES_PER_LINE: usize = 16;

/// The g table as a `static` array of its narrow width.
pub fn table_const<H: EdgeHasher>(mph: &Mphf<H>, name: &str) -> String {
    let g = mph.g_table();
    let elem = match g.entry_bytes() {
        1 => "u8",
        2 => "u16",
        _ => "u32",
    };
    let mut out = format!("pub static {name}: [{elem}; {}] = [\n", g.len());
    for chunk_start in (0..g.len()).step_by(VALUES_PER_LINE) {
        out.push_str("   ");
        for idx in chunk_start..(chunk_start + VALUES_PER_LINE).min(g.len()) {
            out.push_str(&format!(" {},", g.get(idx)));
        }
        out.push('\n');
    }
    out.push_str("];\n");
    out
}

/// The identity-map artifact: one integer `0..n` per key, in input order.
/// A pure restatement of the bijection guarantee, for consumers that want an
/// explicit permutation table.
pub fn identity_map_const<H: EdgeHasher>(mph: &Mphf<H>, name: &str) -> String {
    let n = mph.len();
    let mut out = format!("pub static {name}: [u32; {n}] = [\n");
    for chunk_start in (0..n).step_by(VALUES_PER_LINE) {
        out.push_str("   ");
        for idx in chunk_start..(chunk_start + VALUES_PER_LINE as u32).min(n) {
            out.push_str(&format!(" {idx},"));
        }
        out.push('\n');
    }
    out.push_str("];\n");
    out
}

/// A complete generated module: table plus lookup function.
///
/// Fudge replay guards are emitted only for rules that actually fired during
/// construction, so collision-free builds get the bare formula.
pub fn lookup_module(mph: &Mphf<WyEdgeHasher>, table_name: &str, fn_name: &str) -> String {
    let m = mph.vertex_count();
    let n = mph.len();
    let flags = mph.fudge_flags();
    let arity = mph.arity();

    let mut out = String::new();
    out.push_str("// Generated by chm_mph; do not edit.\n");
    out.push_str("// Requires the `wyhash` crate. Bijective over the original key set.\n\n");
    out.push_str(&table_const(mph, table_name));
    out.push('\n');

    out.push_str(&format!("pub fn {fn_name}(key: &[u8]) -> u32 {{\n"));
    out.push_str(&format!(
        "    let base = wyhash::wyhash(key, {:#018x});\n",
        mph.hasher().salt()
    ));
    out.push_str(&format!(
        "    let v0 = (splitmix64(base ^ {LANE0_XOR:#018x}) as u32) % {m};\n"
    ));
    let mut1 = if flags & FUDGE_01 != 0 { "mut " } else { "" };
    out.push_str(&format!(
        "    let {mut1}v1 = (splitmix64(base.wrapping_add({LANE1_ADD:#x})) as u32) % {m};\n"
    ));
    if arity == 3 {
        let mut2 = if flags & (FUDGE_02 | FUDGE_12) != 0 {
            "mut "
        } else {
            ""
        };
        out.push_str(&format!(
            "    let {mut2}v2 = (splitmix64(base ^ {LANE2_XOR:#018x}) as u32) % {m};\n"
        ));
    }
    if flags & FUDGE_01 != 0 {
        out.push_str("    if v0 == v1 {\n        v1 ^= 1;\n    }\n");
    }
    if arity == 3 && flags & FUDGE_02 != 0 {
        out.push_str(
            "    if v0 == v2 {\n        v2 ^= if v2 ^ 1 == v1 { 2 } else { 1 };\n    }\n",
        );
    }
    if arity == 3 && flags & FUDGE_12 != 0 {
        out.push_str(
            "    if v1 == v2 {\n        v2 ^= if v2 ^ 1 == v0 { 2 } else { 1 };\n    }\n",
        );
    }
    let mut sum = format!(
        "{table_name}[v0 as usize] as u64 + {table_name}[v1 as usize] as u64"
    );
    if arity == 3 {
        sum.push_str(&format!(" + {table_name}[v2 as usize] as u64"));
    }
    out.push_str(&format!("    (({sum}) % {n}) as u32\n}}\n\n"));

    out.push_str(
        "fn splitmix64(x: u64) -> u64 {\n\
         \x20   let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);\n\
         \x20   z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);\n\
         \x20   z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);\n\
         \x20   z ^ (z >> 31)\n\
         }\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildConfig, Builder};

    fn build(n: usize) -> Mphf<WyEdgeHasher> {
        let keys: Vec<Vec<u8>> = (0..n).map(|i| format!("key-{i}").into_bytes()).collect();
        Builder::new().build(keys).unwrap()
    }

    #[test]
    fn table_const_renders_narrow_width() {
        let mph = build(20);
        let text = table_const(&mph, "G");
        assert!(text.starts_with("pub static G: [u8; "));
        assert!(text.ends_with("];\n"));
        // Every table entry shows up.
        assert_eq!(
            text.matches(',').count(),
            mph.g_table().len(),
            "one trailing comma per value"
        );
    }

    #[test]
    fn lookup_module_replays_only_fired_rules() {
        let mph = build(20);
        let text = lookup_module(&mph, "G", "mph_index");
        assert!(text.contains("pub fn mph_index(key: &[u8]) -> u32 {"));
        assert!(text.contains(&format!("% {}", mph.len())));
        if mph.fudge_flags() == 0 {
            assert!(!text.contains("v1 ^= 1"));
        }
    }

    #[test]
    fn arity2_module_has_no_third_lane() {
        let cfg = BuildConfig {
            arity: 2,
            c: 2.1,
            ..BuildConfig::default()
        };
        let keys: Vec<Vec<u8>> = (0..10).map(|i: u32| i.to_le_bytes().to_vec()).collect();
        let mph = Builder::new().with_config(cfg).build(keys).unwrap();
        let text = lookup_module(&mph, "G", "idx");
        assert!(!text.contains("v2"));
    }

    #[test]
    fn identity_map_lists_every_index() {
        let mph = build(5);
        let text = identity_map_const(&mph, "KEY_ORDER");
        assert_eq!(text, "pub static KEY_ORDER: [u32; 5] = [\n    0, 1, 2, 3, 4,\n];\n");
    }
}
