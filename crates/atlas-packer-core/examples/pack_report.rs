use atlas_packer_core::prelude::*;

fn main() -> Result<()> {
    let inputs = vec![
        InputRect::new("hero_idle", 128, 96),
        InputRect::new("hero_run", 128, 96),
        InputRect::new("tileset_grass", 256, 64),
        InputRect::new("tileset_water", 256, 64),
        InputRect::new("icon_sword", 32, 32),
        InputRect::new("icon_shield", 32, 32),
        InputRect::new("banner", 300, 40).with_rotation(false),
        InputRect::new("particle_glow", 16, 16),
    ];

    let cfg = PackerConfig::builder()
        .with_max_dimensions(512, 512)
        .padding(2, 2)
        .allow_rotation(true)
        .build();

    let pages = pack_rects(inputs, cfg)?;

    for page in &pages {
        println!(
            "page {} ({}x{}, occupancy {:.1}%):",
            page.id,
            page.width,
            page.height,
            page.occupancy * 100.0
        );
        for frame in &page.frames {
            println!(
                "  {:<16} {:>4},{:>4} {:>3}x{:<3}{}",
                frame.key,
                frame.frame.x,
                frame.frame.y,
                frame.frame.w,
                frame.frame.h,
                if frame.rotated { " (rotated)" } else { "" }
            );
        }
    }

    let stats = PackStats::from_pages(&pages);
    println!("{}", stats.summary());
    Ok(())
}
