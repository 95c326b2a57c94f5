use raster_paint::{Anchor, CanvasBuffer, CanvasError, Pixel};

const RED: Pixel = Pixel::rgb(255, 0, 0);

#[test]
fn test_new_canvas_is_transparent() {
    let canvas = CanvasBuffer::new(4, 3).unwrap();
    assert_eq!(canvas.width(), 4);
    assert_eq!(canvas.height(), 3);
    assert_eq!(canvas.pixels().len(), 12);
    assert!(canvas.pixels().iter().all(|p| *p == Pixel::TRANSPARENT));
}

#[test]
fn test_zero_or_oversized_dimensions_are_rejected() {
    assert!(matches!(
        CanvasBuffer::new(0, 10),
        Err(CanvasError::InvalidDimensions { width: 0, height: 10 })
    ));
    assert!(matches!(
        CanvasBuffer::new(10, 0),
        Err(CanvasError::InvalidDimensions { .. })
    ));
    assert!(CanvasBuffer::new(10_001, 1).is_err());
    assert!(CanvasBuffer::new(10_000, 1).is_ok());
}

#[test]
fn test_get_and_set_outside_bounds_fail() {
    let mut canvas = CanvasBuffer::new(5, 5).unwrap();

    for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 5), (i32::MAX, i32::MIN)] {
        assert!(
            matches!(canvas.get(x, y), Err(CanvasError::OutOfBounds { .. })),
            "get({x}, {y}) should be out of bounds"
        );
        assert!(
            matches!(canvas.set(x, y, RED), Err(CanvasError::OutOfBounds { .. })),
            "set({x}, {y}) should be out of bounds"
        );
    }
    assert!(canvas.pixels().iter().all(|p| *p == Pixel::TRANSPARENT));
}

#[test]
fn test_set_then_get() {
    let mut canvas = CanvasBuffer::new(5, 5).unwrap();
    canvas.set(4, 2, RED).unwrap();
    assert_eq!(canvas.get(4, 2).unwrap(), RED);
    assert_eq!(canvas.get(2, 4).unwrap(), Pixel::TRANSPARENT);
}

#[test]
fn test_from_rgba_checks_length() {
    let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
    let canvas = CanvasBuffer::from_rgba(2, 1, &bytes).unwrap();
    assert_eq!(canvas.get(1, 0).unwrap(), Pixel::rgba(5, 6, 7, 8));

    assert!(CanvasBuffer::from_rgba(2, 2, &bytes).is_err());
}

#[test]
fn test_clear_makes_everything_transparent() {
    let mut canvas = CanvasBuffer::filled(3, 3, RED).unwrap();
    canvas.clear();
    assert!(canvas.pixels().iter().all(|p| *p == Pixel::TRANSPARENT));
}

#[test]
fn test_grow_keeps_content_at_origin() {
    let mut canvas = CanvasBuffer::new(10, 10).unwrap();
    for y in 0..10 {
        for x in 0..10 {
            canvas.set(x, y, Pixel::rgb(x as u8, y as u8, 7)).unwrap();
        }
    }

    let resized = canvas.resize(20, 20, Anchor::TopLeft).unwrap();
    assert_eq!((resized.width(), resized.height()), (20, 20));
    for y in 0..20 {
        for x in 0..20 {
            let expected = if x < 10 && y < 10 {
                Pixel::rgb(x as u8, y as u8, 7)
            } else {
                Pixel::TRANSPARENT
            };
            assert_eq!(resized.get(x, y).unwrap(), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_shrink_crops_right_and_bottom() {
    let mut canvas = CanvasBuffer::new(4, 4).unwrap();
    canvas.set(1, 1, RED).unwrap();
    canvas.set(3, 3, RED).unwrap();

    let resized = canvas.resize(2, 2, Anchor::TopLeft).unwrap();
    assert_eq!(resized.get(1, 1).unwrap(), RED);
    assert_eq!(resized.pixels().iter().filter(|p| **p == RED).count(), 1);
}

#[test]
fn test_resize_to_zero_width_fails_and_keeps_buffer() {
    let canvas = CanvasBuffer::filled(10, 10, RED).unwrap();
    let result = canvas.resize(0, 10, Anchor::TopLeft);
    assert!(matches!(result, Err(CanvasError::InvalidDimensions { width: 0, .. })));
    assert_eq!((canvas.width(), canvas.height()), (10, 10));
    assert!(canvas.pixels().iter().all(|p| *p == RED));
}

#[test]
fn test_resize_anchors() {
    let mut canvas = CanvasBuffer::new(2, 2).unwrap();
    canvas.set(0, 0, RED).unwrap();

    let centered = canvas.resize(4, 4, Anchor::Center).unwrap();
    assert_eq!(centered.get(1, 1).unwrap(), RED);

    let bottom_right = canvas.resize(4, 4, Anchor::BottomRight).unwrap();
    assert_eq!(bottom_right.get(2, 2).unwrap(), RED);

    let top = canvas.resize(4, 2, Anchor::Top).unwrap();
    assert_eq!(top.get(1, 0).unwrap(), RED);

    // Shrinking from the bottom-right anchor keeps the bottom-right corner
    let mut corner = CanvasBuffer::new(3, 3).unwrap();
    corner.set(2, 2, RED).unwrap();
    let cropped = corner.resize(1, 1, Anchor::BottomRight).unwrap();
    assert_eq!(cropped.get(0, 0).unwrap(), RED);
}

#[test]
fn test_flattened_composites_onto_background() {
    let mut canvas = CanvasBuffer::new(2, 1).unwrap();
    canvas.set(1, 0, Pixel::rgb(10, 20, 30)).unwrap();

    let flat = canvas.flattened(Pixel::WHITE);
    assert_eq!(flat.get(0, 0).unwrap(), Pixel::WHITE);
    assert_eq!(flat.get(1, 0).unwrap(), Pixel::rgb(10, 20, 30));
    assert!(flat.pixels().iter().all(|p| p.a == 255));
}
