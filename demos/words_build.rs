use chm_mph::{BuildConfig, Builder, ChmError, codegen};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

const N_KEYS: usize = 1_000_000;
const GEN_SEED: u64 = 42;

fn main() -> Result<(), ChmError> {
    println!("--- chm_mph demo ---");
    println!("n = {N_KEYS}");

    // 1) Generate unique keys
    let t0 = Instant::now();
    let keys = gen_unique_keys(N_KEYS, GEN_SEED);
    let gen_s = t0.elapsed().as_secs_f64();
    println!(
        "gen:    {:>8.3} s   ({:.1} M keys/s)",
        gen_s,
        N_KEYS as f64 / gen_s / 1e6
    );

    // 2) Build the CHM function (3-uniform hypergraph, fudging on)
    let cfg = BuildConfig {
        // c can be varied between 1.24..1.35; larger means fewer retries.
        c: 1.29,
        rehash_limit: 32,
        ..Default::default()
    };
    let t1 = Instant::now();
    let mph = Builder::new()
        .with_config(cfg)
        .build(keys.iter().map(|v| v.as_slice()))?;
    let build_s = t1.elapsed().as_secs_f64();
    println!(
        "build:  {:>8.3} s   ({:.1} M keys/s)",
        build_s,
        N_KEYS as f64 / build_s / 1e6
    );
    println!(
        "table:  {} entries x {} B   fudge flags {:#05b}",
        mph.g_table().len(),
        mph.g_table().entry_bytes(),
        mph.fudge_flags()
    );

    // 3) Verify the bijection exhaustively
    let t2 = Instant::now();
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(mph.index(k), i as u32);
    }
    let lookup_s = t2.elapsed().as_secs_f64();
    println!(
        "verify: {:>8.3} s   ({:.1} M lookups/s)",
        lookup_s,
        N_KEYS as f64 / lookup_s / 1e6
    );

    println!("----------------------------------------------");
    println!(
        "Total (gen + build + verify): {:.3} s",
        gen_s + build_s + lookup_s
    );

    // 4) Show the generated-code artifact on a toy key set
    let words = ["january", "february", "march", "april", "may", "june"];
    let toy = Builder::new().build(words.iter().map(|w| w.as_bytes()))?;
    println!("\ngenerated lookup module for {} month names:\n", words.len());
    println!("{}", codegen::lookup_module(&toy, "G", "month_index"));

    Ok(())
}

/// Generate N unique 16-byte keys (raw bytes), deterministically.
fn gen_unique_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = HashSet::with_capacity(n * 2);
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        if set.insert(buf) {
            keys.push(buf.to_vec());
        }
    }
    keys
}
