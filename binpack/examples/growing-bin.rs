use binpack::{GrowRule, Heuristic, MaxRectsBin};

fn main() {
    env_logger::init();

    let sizes: Vec<_> = (1..=24).map(|i| (8 + i * 3 % 17, 12 + i * 7 % 13)).collect();

    let mut bin = MaxRectsBin::new(64, 64, GrowRule::Both, -2, true);
    bin.set_padding(1, 1);

    match bin.insert_all(&sizes, Heuristic::BestShortSideFit) {
        Ok(placed) => {
            for (size, rect) in sizes.iter().zip(&placed) {
                println!("{:?} -> {}", size, rect);
            }

            println!(
                "Bin is {}x{}, {:.1}% occupied ({:.1}% of the used area)",
                bin.bin_width(),
                bin.bin_height(),
                bin.occupancy(false) * 100.0,
                bin.occupancy(true) * 100.0
            );
        }
        Err(err) => eprintln!("Error: {}", err),
    }
}
