use rawseq::{viewer, Direction, Frame, ImageBank, Selection, SequenceConfig, SequenceGenerator};

#[doc(hidden)]
fn main() -> rawseq::Result<()> {
    let bank = ImageBank::from_frames(Direction::ALL.map(|d| (d, Frame::default())));
    let config = SequenceConfig {
        frame_count: 5,
        patch_width: 4,
        patch_height: 4,
        start: rawseq::Origin { x: 125, y: 0 },
        selection: Selection::Fixed(Direction::Right),
        ..SequenceConfig::default()
    };
    for generated in SequenceGenerator::new(&bank, config)? {
        println!(
            "img{}: {} patch at ({}, {}) {}x{}",
            generated.index,
            generated.direction,
            generated.patch.x,
            generated.patch.y,
            generated.patch.width,
            generated.patch.height
        );
        let grid = viewer::format_grid(&generated.frame);
        for line in grid.lines().take(4) {
            println!("  ...{}", &line[line.len() - 23..]);
        }
    }
    Ok(())
}
