use std::io::Cursor;

use rand::{SeedableRng, rngs::StdRng};

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "chatstrip_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

fn solid(w: u32, h: u32) -> PreparedImage {
    PreparedImage::new(image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255])))
}

#[test]
fn load_reads_characters_and_backgrounds() {
    let tmp = temp_dir("store_load");
    write_png(&tmp.join("characters/anna/neutral.png"), 4, 6, [255, 0, 0, 255]);
    write_png(&tmp.join("characters/anna/happy.png"), 4, 6, [0, 255, 0, 255]);
    write_png(&tmp.join("characters/bob/neutral.png"), 2, 2, [0, 0, 255, 255]);
    write_png(&tmp.join("backgrounds/basket.png"), 8, 5, [9, 9, 9, 255]);

    let store = AssetStore::load(&tmp).unwrap();
    assert_eq!(store.character_count(), 2);
    assert_eq!(store.background_count(), 1);
    assert_eq!(store.font_count(), 0);

    let anna = store.character("anna").unwrap();
    assert_eq!(anna.name(), "anna");
    assert_eq!(anna.expressions().collect::<Vec<_>>(), vec!["happy", "neutral"]);
    let neutral = anna.sprite("neutral").unwrap();
    assert_eq!((neutral.width(), neutral.height()), (4, 6));
    assert_eq!(neutral.rgba().get_pixel(0, 0).0, [255, 0, 0, 255]);

    let bg = store.background("basket").unwrap();
    assert_eq!((bg.width(), bg.height()), (8, 5));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn load_skips_undecodable_files_and_hidden_entries() {
    let tmp = temp_dir("store_skip");
    write_png(&tmp.join("characters/anna/neutral.png"), 2, 2, [1, 1, 1, 255]);
    std::fs::write(tmp.join("characters/anna/broken.png"), b"junk").unwrap();
    write_png(&tmp.join("characters/.hidden/neutral.png"), 2, 2, [1, 1, 1, 255]);
    std::fs::create_dir_all(tmp.join("characters/empty")).unwrap();
    std::fs::create_dir_all(tmp.join("fonts")).unwrap();
    std::fs::write(tmp.join("fonts/bad.ttf"), b"not a font").unwrap();
    std::fs::write(tmp.join("fonts/readme.txt"), b"ignored").unwrap();

    let store = AssetStore::load(&tmp).unwrap();
    assert_eq!(store.character_count(), 1);
    let anna = store.character("anna").unwrap();
    assert!(anna.sprite("broken").is_none());
    assert!(store.character(".hidden").is_none());
    assert!(store.character("empty").is_none());
    assert_eq!(store.font_count(), 0);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn first_file_for_a_stem_wins() {
    let tmp = temp_dir("store_first_wins");
    write_png(&tmp.join("backgrounds/park.bmp.png"), 1, 1, [0, 0, 0, 255]);
    write_png(&tmp.join("backgrounds/room.a"), 3, 3, [10, 0, 0, 255]);
    write_png(&tmp.join("backgrounds/room.b"), 5, 5, [20, 0, 0, 255]);

    let store = AssetStore::load(&tmp).unwrap();
    let room = store.background("room").unwrap();
    assert_eq!(room.width(), 3);
    assert!(store.background("park.bmp").is_some());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_root_loads_empty_store() {
    let tmp = temp_dir("store_missing");
    let store = AssetStore::load(&tmp).unwrap();
    assert_eq!(store.character_count(), 0);
    assert_eq!(store.background_count(), 0);
    assert_eq!(store.font_count(), 0);
}

#[test]
fn insert_keeps_existing_entries() {
    let mut store = AssetStore::new();
    assert!(store.insert_background("a", solid(1, 1)));
    assert!(!store.insert_background("a", solid(2, 2)));
    assert_eq!(store.background("a").unwrap().width(), 1);

    assert!(store.insert_character(Character::new("x").with_sprite("neutral", solid(1, 1))));
    assert!(!store.insert_character(Character::new("x")));
    assert!(store.character("x").unwrap().sprite("neutral").is_some());

    let font = PreparedFont {
        name: "f".to_string(),
        bytes: Arc::new(vec![1, 2, 3]),
    };
    assert!(store.insert_font(font.clone()));
    assert!(!store.insert_font(font));
    assert_eq!(store.font("f").unwrap().bytes.len(), 3);
}

#[test]
fn character_keeps_first_sprite_per_expression() {
    let mut c = Character::new("c");
    assert!(c.insert_sprite("neutral", solid(1, 1)));
    assert!(!c.insert_sprite("neutral", solid(2, 2)));
    assert_eq!(c.sprite("neutral").unwrap().width(), 1);
}

#[test]
fn random_character_picks_a_loaded_one_or_none() {
    let mut rng = StdRng::seed_from_u64(7);
    let empty = AssetStore::new();
    assert!(empty.random_character(&mut rng).is_none());

    let mut store = AssetStore::new();
    for name in ["a", "b", "c"] {
        store.insert_character(Character::new(name).with_sprite("neutral", solid(1, 1)));
    }
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..64 {
        let c = store.random_character(&mut rng).unwrap();
        seen.insert(c.name().to_string());
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn random_character_is_reproducible_for_a_seed() {
    let mut store = AssetStore::new();
    for name in ["a", "b", "c", "d"] {
        store.insert_character(Character::new(name).with_sprite("neutral", solid(1, 1)));
    }
    let pick = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..8)
            .map(|_| store.random_character(&mut rng).unwrap().name().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(pick(42), pick(42));
}
