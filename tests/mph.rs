use chm_mph::{BuildConfig, Builder, ChmError, Xxh3EdgeHasher};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;

fn gen_unique_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(n);
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let len = 4 + (rng.next_u32() % 24) as usize;
        let mut key = vec![0u8; len];
        rng.fill_bytes(&mut key);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

#[test]
fn bijection_is_exhaustive_arity3() {
    let keys = gen_unique_keys(5000, 42);
    let mph = Builder::new()
        .build(keys.iter().map(|k| k.as_slice()))
        .unwrap();

    let mut seen = vec![false; keys.len()];
    for (i, key) in keys.iter().enumerate() {
        let idx = mph.index(key);
        assert_eq!(idx, i as u32);
        assert!(!seen[idx as usize]);
        seen[idx as usize] = true;
    }
    assert!(seen.iter().all(|&b| b));
}

#[test]
fn bijection_is_exhaustive_arity2() {
    let cfg = BuildConfig {
        arity: 2,
        c: 2.2,
        rehash_limit: 64,
        ..BuildConfig::default()
    };
    let keys = gen_unique_keys(500, 7);
    let mph = Builder::new()
        .with_config(cfg)
        .build(keys.iter().map(|k| k.as_slice()))
        .unwrap();

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(mph.index(key), i as u32);
    }
}

#[test]
fn lookup_is_idempotent() {
    let keys = gen_unique_keys(100, 3);
    let mph = Builder::new()
        .build(keys.iter().map(|k| k.as_slice()))
        .unwrap();
    for key in &keys {
        assert_eq!(mph.index(key), mph.index(key));
    }
}

#[test]
fn xxh3_hasher_builds_a_valid_mph() {
    let keys = gen_unique_keys(1000, 9);
    let mph = Builder::new()
        .with_hasher(Xxh3EdgeHasher::new(0))
        .build(keys.iter().map(|k| k.as_slice()))
        .unwrap();
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(mph.index(key), i as u32);
    }
}

#[test]
fn duplicate_anywhere_in_the_input_is_fatal() {
    let mut keys = gen_unique_keys(200, 11);
    keys.push(keys[57].clone());
    let err = Builder::new().build(keys).unwrap_err();
    assert!(matches!(err, ChmError::DuplicateKeys));
}

#[test]
fn g_table_sums_reproduce_indices_over_the_whole_set() {
    // The whole-table invariant, observed through the public lookup: every
    // key's g-sum mod n must equal its index, with no slot hit twice.
    let keys = gen_unique_keys(2048, 23);
    let mph = Builder::new()
        .with_config(BuildConfig::default())
        .build(keys.iter().map(|k| k.as_slice()))
        .unwrap();
    assert_eq!(mph.len(), 2048);
    assert!(mph.g_table().len() as u32 == mph.vertex_count());
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(mph.index(key), i as u32);
    }
}

#[test]
fn str_keys_build_and_look_up() {
    let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
    let mph = Builder::new()
        .build(words.iter().map(|w| w.as_bytes()))
        .unwrap();
    for (i, w) in words.iter().enumerate() {
        assert_eq!(mph.index_str(w), i as u32);
    }
}

#[cfg(feature = "serde")]
#[test]
fn serialized_mph_answers_like_the_original() {
    let keys = gen_unique_keys(300, 31);
    let mph = Builder::new()
        .build(keys.iter().map(|k| k.as_slice()))
        .unwrap();
    let restored: chm_mph::Mphf = chm_mph::Mphf::from_bytes(&mph.to_bytes().unwrap()).unwrap();
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(restored.index(key), i as u32);
    }
}
