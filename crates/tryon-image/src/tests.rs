use std::path::Path;

use super::*;
use Color as C;

fn mkimage<const W: usize, const H: usize>(data: [[Color; W]; H]) -> Image {
    let mut image = Image::new(W as u32, H as u32);
    for (y, row) in data.iter().enumerate() {
        for (x, color) in row.iter().enumerate() {
            image.set(x as u32, y as u32, *color);
        }
    }
    image
}

#[test]
fn view() {
    let image = mkimage([[C::RED, C::GREEN]]);

    let view = image.view(Rect::from_top_left(1.0, 0.0, 1.0, 1.0));
    assert_eq!(view.width(), 1);
    assert_eq!(view.height(), 1);
    assert_eq!(view.get(0, 0), C::GREEN);

    let view = image.view(Rect::from_top_left(1.0, 0.0, 99.0, 100.0));
    assert_eq!(view.width(), 99);
    assert_eq!(view.height(), 100);
    assert_eq!(view.get(0, 0), C::GREEN);
    assert_eq!(view.get(0, 1), C::NULL);
    assert_eq!(view.get(1, 0), C::NULL);

    let left_of_image = image.view(Rect::from_top_left(-1.0, 0.0, 2.0, 1.0));
    assert_eq!(left_of_image.get(0, 0), C::NULL);
    assert_eq!(left_of_image.get(1, 0), C::RED);
}

#[test]
fn visible_range_is_clipped() {
    let mut frame = Image::filled(64, 64, C::BLACK);

    // Only the 4x8 bottom right corner of the frame is covered.
    let view = frame.view_mut(Rect::from_top_left(60.0, 56.0, 4000.0, 1000.0));
    let (xs, ys) = view.visible_range().unwrap();
    assert!(xs.start == 0 && xs.end <= 5, "{xs:?}");
    assert!(ys.start == 0 && ys.end <= 9, "{ys:?}");

    let view = frame.view_mut(Rect::from_top_left(-3996.0, -992.0, 4000.0, 1000.0));
    let (xs, ys) = view.visible_range().unwrap();
    assert!(xs.start >= 3995 && xs.end == 4000, "{xs:?}");
    assert!(ys.start >= 991 && ys.end == 1000, "{ys:?}");

    let view = frame.view_mut(Rect::from_top_left(100.0, 0.0, 10.0, 10.0));
    assert!(view.visible_range().is_none());
}

#[test]
fn blend_large_overlay_maps_through_whole_view() {
    let mut frame = Image::filled(8, 8, C::BLACK);
    let overlay = mkimage([[C::RED, C::BLUE]]);

    // Left half of the overlay is off-screen, the frame only sees the blue half.
    frame
        .view_mut(Rect::from_top_left(-4000.0, 0.0, 4004.0, 2.0))
        .blend_from(&overlay);

    for x in 0..4 {
        assert_eq!(frame.get(x, 0), C::BLUE, "x={x}");
        assert_eq!(frame.get(x, 1), C::BLUE, "x={x}");
    }
    assert_eq!(frame.get(4, 0), C::BLACK);
    assert_eq!(frame.get(0, 2), C::BLACK);
}

#[test]
fn blend() {
    let mut image = mkimage([[C::RED]]);
    let overlay = mkimage([[C::GREEN.with_alpha(0)]]);
    image.blend_from(&overlay).mode(BlendMode::Alpha);
    assert_eq!(image.get(0, 0), C::RED); // no change

    let mut image = mkimage([[C::RED]]);
    let overlay = mkimage([[C::GREEN.with_alpha(0)]]);
    image.blend_from(&overlay).mode(BlendMode::Overwrite);
    assert_eq!(image.get(0, 0), C::GREEN.with_alpha(0));

    let mut image = mkimage([[C::RED]]);
    let overlay = mkimage([[C::GREEN]]);
    image.blend_from(&overlay);
    assert_eq!(image.get(0, 0), C::GREEN);
}

#[test]
fn blend_stretches_source() {
    let mut frame = Image::filled(4, 4, C::BLACK);
    let overlay = mkimage([[C::RED, C::BLUE]]);

    frame
        .view_mut(Rect::from_top_left(0.0, 2.0, 4.0, 2.0))
        .blend_from(&overlay);

    assert_eq!(frame.get(0, 0), C::BLACK);
    assert_eq!(frame.get(3, 1), C::BLACK);
    assert_eq!(frame.get(0, 2), C::RED);
    assert_eq!(frame.get(1, 3), C::RED);
    assert_eq!(frame.get(2, 2), C::BLUE);
    assert_eq!(frame.get(3, 3), C::BLUE);
}

#[test]
fn blend_off_the_edge() {
    let mut frame = Image::filled(2, 2, C::BLACK);
    let overlay = Image::filled(2, 2, C::YELLOW);

    // Only the right column of the overlay lands on the frame.
    frame
        .view_mut(Rect::from_top_left(-1.0, 0.0, 2.0, 2.0))
        .blend_from(&overlay);

    assert_eq!(frame.get(0, 0), C::YELLOW);
    assert_eq!(frame.get(0, 1), C::YELLOW);
    assert_eq!(frame.get(1, 0), C::BLACK);
    assert_eq!(frame.get(1, 1), C::BLACK);
}

#[test]
fn empty_source_is_ignored() {
    let mut frame = Image::filled(1, 1, C::WHITE);
    let overlay = Image::new(0, 0);
    frame.blend_from(&overlay);
    assert_eq!(frame.get(0, 0), C::WHITE);
}

#[test]
fn format_from_path() {
    assert_eq!(
        ImageFormat::from_path(Path::new("neck2.png")).unwrap(),
        ImageFormat::Png
    );
    assert_eq!(
        ImageFormat::from_path(Path::new("frame.jpeg")).unwrap(),
        ImageFormat::Jpeg
    );
    assert!(ImageFormat::from_path(Path::new("neck2.gif")).is_err());
    assert!(ImageFormat::from_path(Path::new("neck2")).is_err());
}

#[test]
fn save_and_load_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixel.png");

    let image = mkimage([[C::RED, C::GREEN.with_alpha(128)], [C::BLUE, C::NULL]]);
    image.save(&path).unwrap();

    let loaded = Image::load(&path).unwrap();
    assert_eq!(loaded.resolution(), Resolution::new(2, 2));
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(loaded.get(x, y), image.get(x, y));
    }
}

#[test]
fn decode_garbage_fails() {
    assert!(Image::decode(b"definitely not a png", ImageFormat::Png).is_err());
}
