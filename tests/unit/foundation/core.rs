use super::*;

#[test]
fn premultiply_opaque_is_identity() {
    assert_eq!(Rgba8::opaque(10, 20, 30).premultiplied(), [10, 20, 30, 255]);
}

#[test]
fn premultiply_transparent_is_zero() {
    let c = Rgba8 {
        r: 200,
        g: 100,
        b: 50,
        a: 0,
    };
    assert_eq!(c.premultiplied(), [0, 0, 0, 0]);
}

#[test]
fn new_rejects_mismatched_length() {
    assert!(Raster::new(2, 2, vec![0; 15]).is_err());
    assert!(Raster::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn filled_and_pixel_lookup() {
    let r = Raster::filled(3, 2, Rgba8::opaque(1, 2, 3));
    assert_eq!(r.size(), (3, 2));
    assert_eq!(r.pixel(2, 1), Some([1, 2, 3, 255]));
    assert_eq!(r.pixel(3, 0), None);
}

#[test]
fn flatten_transparent_pixels_over_background() {
    let r = Raster::new(2, 1, vec![0, 0, 0, 0, 9, 8, 7, 255]).unwrap();
    let img = r.to_opaque_rgba_image(Rgba8::WHITE).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [9, 8, 7, 255]);
}
