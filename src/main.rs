use gapped_bitmap::intersect;
use gapped_bitmap::SparseBitmap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let b1 = SparseBitmap::from_sorted(&[1, 2, 100, 150, 1000, 123_456])?;
    let b2 = SparseBitmap::from_sorted(&[1, 2, 3, 1000, 123_456, 1_234_567])?;

    println!("b1        = {b1}");
    println!("b2        = {b2}");
    println!("b1 and b2 = {}", b1.and(&b2));
    println!("b1 or  b2 = {}", b1.or(&b2));
    println!("b1 xor b2 = {}", b1.xor(&b2));

    let family = [b1, b2];
    let skip = intersect::fast_and(intersect::cursors(&family))?;
    println!("fast_and  = {}", intersect::materialize(skip));

    Ok(())
}
