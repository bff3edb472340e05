use atlas_packer_core::model::{InputRect, Page};
use atlas_packer_core::pipeline::pack_rects;
use atlas_packer_core::prelude::PackerConfig;
use rand::{Rng, SeedableRng};

fn inputs(count: usize, seed: u64) -> Vec<InputRect> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            InputRect::new(
                format!("sprite_{i:03}"),
                rng.gen_range(8..=96),
                rng.gen_range(8..=96),
            )
        })
        .collect()
}

fn cfg(fast: bool, allow_rotation: bool) -> PackerConfig {
    PackerConfig::builder()
        .with_max_dimensions(512, 512)
        .pot(false)
        .fast(fast)
        .allow_rotation(allow_rotation)
        .build()
}

fn all_keys_sorted(pages: &[Page]) -> Vec<String> {
    let mut keys: Vec<String> = pages
        .iter()
        .flat_map(|p| p.frames.iter().map(|f| f.key.clone()))
        .collect();
    keys.sort();
    keys
}

#[test]
fn fast_mode_places_every_input() {
    let input = inputs(80, 5);
    let expected: usize = input.len();
    let pages = pack_rects(input, cfg(true, false)).unwrap();
    assert!(!pages.is_empty());
    let placed: usize = pages.iter().map(|p| p.frames.len()).sum();
    assert_eq!(placed, expected);
    for page in &pages {
        assert!(page.occupancy > 0.0 && page.occupancy <= 1.0);
        for frame in &page.frames {
            assert!(frame.frame.max_x() <= page.width);
            assert!(frame.frame.max_y() <= page.height);
        }
    }
}

#[test]
fn fast_mode_matches_exhaustive_key_set() {
    let input = inputs(80, 9);
    let fast_pages = pack_rects(input.clone(), cfg(true, false)).unwrap();
    let full_pages = pack_rects(input, cfg(false, false)).unwrap();
    assert_eq!(all_keys_sorted(&fast_pages), all_keys_sorted(&full_pages));
}

#[test]
fn fast_mode_is_deterministic() {
    let a = pack_rects(inputs(80, 33), cfg(true, true)).unwrap();
    let b = pack_rects(inputs(80, 33), cfg(true, true)).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn fast_mode_never_rotates_forbidden_rects() {
    let mut input = inputs(40, 41);
    for (i, rect) in input.iter_mut().enumerate() {
        if i % 2 == 0 {
            *rect = rect.clone().with_rotation(false);
        }
    }
    let locked: Vec<String> = input
        .iter()
        .filter(|r| !r.allow_rotation)
        .map(|r| r.key.clone())
        .collect();
    let pages = pack_rects(input, cfg(true, true)).unwrap();
    for page in &pages {
        for frame in &page.frames {
            if locked.contains(&frame.key) {
                assert!(!frame.rotated, "{} was rotated despite opting out", frame.key);
            }
        }
    }
}

#[test]
fn fast_mode_keeps_padding_gaps() {
    let input = inputs(60, 47);
    let cfg = PackerConfig::builder()
        .with_max_dimensions(512, 512)
        .padding(4, 4)
        .pot(false)
        .fast(true)
        .build();
    let pages = pack_rects(input, cfg).unwrap();
    for page in &pages {
        for i in 0..page.frames.len() {
            for j in (i + 1)..page.frames.len() {
                let mut a = page.frames[i].frame;
                let mut b = page.frames[j].frame;
                a.w += 4;
                a.h += 4;
                b.w += 4;
                b.h += 4;
                assert!(!a.intersects(&b));
            }
        }
    }
}
