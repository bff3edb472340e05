use atlas_packer_core::config::{Heuristic, PackerConfig};
use atlas_packer_core::error::AtlasPackerError;
use atlas_packer_core::model::InputRect;
use atlas_packer_core::pipeline::pack_rects;

#[test]
fn default_config_is_valid() {
    assert!(PackerConfig::default().validate().is_ok());
}

#[test]
fn zero_max_dimensions_rejected() {
    let cfg = PackerConfig {
        max_width: 0,
        ..Default::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(AtlasPackerError::InvalidConfig(_))
    ));
}

#[test]
fn min_exceeding_max_rejected() {
    let cfg = PackerConfig::builder()
        .with_min_dimensions(2048, 16)
        .with_max_dimensions(1024, 1024)
        .build();
    assert!(matches!(
        cfg.validate(),
        Err(AtlasPackerError::InvalidConfig(_))
    ));

    let cfg = PackerConfig::builder()
        .with_min_dimensions(16, 2048)
        .with_max_dimensions(1024, 1024)
        .build();
    assert!(cfg.validate().is_err());
}

#[test]
fn pot_requires_pot_max() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(1000, 1024)
        .pot(true)
        .build();
    assert!(cfg.validate().is_err());
}

#[test]
fn mod4_requires_mod4_max() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(1022, 1024)
        .pot(false)
        .multiple_of_four(true)
        .build();
    assert!(cfg.validate().is_err());
}

#[test]
fn quantization_modes_are_exclusive() {
    let cfg = PackerConfig::builder()
        .pot(true)
        .multiple_of_four(true)
        .build();
    assert!(cfg.validate().is_err());
}

#[test]
fn empty_input_rejected() {
    let err = pack_rects(Vec::new(), PackerConfig::default()).unwrap_err();
    assert!(matches!(err, AtlasPackerError::Empty));
}

#[test]
fn config_errors_surface_through_pack() {
    let cfg = PackerConfig {
        max_width: 0,
        ..Default::default()
    };
    let err = pack_rects(vec![InputRect::new("a", 8, 8)], cfg).unwrap_err();
    assert!(matches!(err, AtlasPackerError::InvalidConfig(_)));
}

#[test]
fn heuristic_parsing_short_aliases() {
    assert_eq!("bssf".parse(), Ok(Heuristic::BestShortSideFit));
    assert_eq!("blsf".parse(), Ok(Heuristic::BestLongSideFit));
    assert_eq!("baf".parse(), Ok(Heuristic::BestAreaFit));
    assert_eq!("bl".parse(), Ok(Heuristic::BottomLeft));
    assert_eq!("cp".parse(), Ok(Heuristic::ContactPoint));
    assert_eq!("BestAreaFit".parse(), Ok(Heuristic::BestAreaFit));
    assert!("nope".parse::<Heuristic>().is_err());
}

#[test]
fn builder_sets_fields() {
    let cfg = PackerConfig::builder()
        .with_min_dimensions(32, 64)
        .with_max_dimensions(512, 256)
        .padding(1, 3)
        .edge_padding(false)
        .duplicate_padding(true)
        .allow_rotation(true)
        .square(true)
        .pot(false)
        .multiple_of_four(true)
        .fast(true)
        .build();
    assert_eq!(cfg.min_width, 32);
    assert_eq!(cfg.min_height, 64);
    assert_eq!(cfg.max_width, 512);
    assert_eq!(cfg.max_height, 256);
    assert_eq!(cfg.padding_x, 1);
    assert_eq!(cfg.padding_y, 3);
    assert!(!cfg.edge_padding);
    assert!(cfg.duplicate_padding);
    assert!(cfg.allow_rotation);
    assert!(cfg.square);
    assert!(!cfg.pot);
    assert!(cfg.multiple_of_four);
    assert!(cfg.fast);
}
