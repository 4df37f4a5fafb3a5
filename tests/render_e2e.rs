use std::path::Path;

use insignia::{
    DrawOptions, DrawOutput, ImageKind, InsigniaError, OutputTarget, RenderConfig, TextPair,
    draw, draw_to_file, draw_to_vec, draw_to_writer,
};

fn test_config() -> RenderConfig {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    RenderConfig {
        assets_root: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
        ..RenderConfig::default()
    }
}

#[test]
fn jpeg_file_mode_writes_a_valid_image() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mark.jpg");

    let written = draw_to_file("Blue", "Archive", &out, &test_config()).unwrap();
    assert_eq!(written, out);
    assert!(out.is_file());

    let img = image::open(&out).unwrap();
    assert!(img.width() > 0 && img.height() > 0);
    let cfg = test_config();
    assert!(f64::from(img.width()) < cfg.max_canvas_width * cfg.scale);
}

#[test]
fn png_file_mode_writes_a_valid_image() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mark.png");

    draw_to_file("Blue", "Archive", &out, &test_config()).unwrap();
    let img = image::open(&out).unwrap();
    assert!(img.width() > 0 && img.height() > 0);
}

#[test]
fn stream_mode_returns_encoded_bytes() {
    let cfg = test_config();

    let jpeg = draw_to_vec("Blue", "Archive", ImageKind::Jpeg, &cfg).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let png = draw_to_vec("Blue", "Archive", ImageKind::Png, &cfg).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    // Stream and file mode encode the same scene.
    let img = image::load_from_memory(&png).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mark.png");
    draw_to_file("Blue", "Archive", &out, &cfg).unwrap();
    let file_img = image::open(&out).unwrap();
    assert_eq!(
        (img.width(), img.height()),
        (file_img.width(), file_img.height())
    );
}

#[test]
fn writer_mode_pipes_the_same_bytes() {
    let cfg = test_config();
    let direct = draw_to_vec("Blue", "Archive", ImageKind::Jpeg, &cfg).unwrap();

    let mut piped = Vec::new();
    draw_to_writer("Blue", "Archive", ImageKind::Jpeg, &cfg, &mut piped).unwrap();
    assert_eq!(direct, piped);
}

#[test]
fn rendering_is_deterministic() {
    let cfg = test_config();
    let a = draw_to_vec("Blue", "Archive", ImageKind::Png, &cfg).unwrap();
    let b = draw_to_vec("Blue", "Archive", ImageKind::Png, &cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn newlines_in_input_are_stripped_not_fatal() {
    let cfg = test_config();
    let with_newlines = draw_to_vec("abc\n", "ab\nc", ImageKind::Png, &cfg).unwrap();
    let plain = draw_to_vec("abc", "abc", ImageKind::Png, &cfg).unwrap();
    assert_eq!(with_newlines, plain);
}

#[test]
fn overlong_text_is_rejected_before_any_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.jpg");

    let long_right = "wide text segment ".repeat(12);
    let err = draw_to_file("Blue", &long_right, &out, &test_config()).unwrap_err();
    assert!(matches!(err, InsigniaError::TextTooLong(_)));
    assert!(!out.exists());
}

#[test]
fn empty_text_is_rejected() {
    let cfg = test_config();
    for (left, right) in [("", ""), ("1", ""), ("", "1"), ("  ", "x"), ("x", " \r\n ")] {
        let err = draw_to_vec(left, right, ImageKind::Jpeg, &cfg).unwrap_err();
        assert!(
            matches!(err, InsigniaError::EmptyText(_)),
            "({left:?}, {right:?})"
        );
    }
}

#[test]
fn bad_output_extensions_are_rejected() {
    let cfg = test_config();
    for name in ["out", "out.gif", "out.jpg.bak"] {
        let err = draw(
            &DrawOptions {
                text: TextPair {
                    left: "Blue".to_string(),
                    right: "Archive".to_string(),
                },
                output: OutputTarget::File(name.into()),
            },
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, InsigniaError::InvalidExtension(_)), "{name}");
    }
}

#[test]
fn transparent_background_keeps_alpha_in_png() {
    let cfg = RenderConfig {
        transparent_background: true,
        ..test_config()
    };
    let png = draw_to_vec("Blue", "Archive", ImageKind::Png, &cfg).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    // The corner away from every layer stays fully transparent.
    assert_eq!(img.get_pixel(img.width() - 1, img.height() - 1)[3], 0);

    let opaque = draw_to_vec("Blue", "Archive", ImageKind::Png, &test_config()).unwrap();
    let opaque_img = image::load_from_memory(&opaque).unwrap().to_rgba8();
    assert_eq!(
        opaque_img.get_pixel(opaque_img.width() - 1, opaque_img.height() - 1)[3],
        255
    );
}

#[test]
fn file_mode_reports_draw_output_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mark.jpg");
    let result = draw(
        &DrawOptions {
            text: TextPair {
                left: "Blue".to_string(),
                right: "Archive".to_string(),
            },
            output: OutputTarget::File(out.clone()),
        },
        &test_config(),
    )
    .unwrap();
    match result {
        DrawOutput::Written(p) => assert_eq!(p, out),
        DrawOutput::Bytes(_) => panic!("file mode returned bytes"),
    }
}
