use atlas_packer_core::model::InputRect;
use atlas_packer_core::pipeline::{pack_rects, pack_rects_with_progress};
use atlas_packer_core::prelude::PackerConfig;
use rand::{Rng, SeedableRng};

fn inputs(seed: u64) -> Vec<InputRect> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..120)
        .map(|i| {
            InputRect::new(
                format!("asset_{i:03}"),
                rng.gen_range(4..=120),
                rng.gen_range(4..=120),
            )
        })
        .collect()
}

fn cfg() -> PackerConfig {
    PackerConfig::builder()
        .with_max_dimensions(512, 512)
        .allow_rotation(true)
        .pot(false)
        .build()
}

#[test]
fn identical_runs_produce_identical_pages() {
    let a = pack_rects(inputs(1234), cfg()).unwrap();
    let b = pack_rects(inputs(1234), cfg()).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn progress_variant_matches_plain_pack() {
    let a = pack_rects(inputs(987), cfg()).unwrap();
    let b = pack_rects_with_progress(inputs(987), cfg(), |_| true).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn pot_runs_are_deterministic_too() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(1024, 1024)
        .pot(true)
        .build();
    let a = pack_rects(inputs(55), cfg.clone()).unwrap();
    let b = pack_rects(inputs(55), cfg).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
