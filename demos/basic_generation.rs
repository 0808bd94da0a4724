use std::error::Error;

use dmism::{DMBuilder, Shape};

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, the smallest fitting size is chosen
    let dm = DMBuilder::new(b"Hello, World!").build()?;
    println!("{}x{} symbol:{}", dm.rows(), dm.cols(), dm.to_debug_str());

    // Rectangular symbol from text, with the DMRE sizes allowed
    let dm = DMBuilder::from_text("Größe: 42 cm")?
        .shape(Shape::Rectangle) // Restrict to rectangles - if not provided, any shape fits
        .rect_extension(true) // Allow DMRE sizes - if not provided, defaults to false
        .build()?;
    println!("{}x{} symbol:{}", dm.rows(), dm.cols(), dm.to_debug_str());

    for seg in dm.segments() {
        println!("{:?}: bytes {}..{}", seg.mode, seg.start, seg.end());
    }
    Ok(())
}
