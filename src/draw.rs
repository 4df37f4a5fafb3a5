use std::{io::Write, path::PathBuf};

use crate::{
    config::RenderConfig,
    decor,
    encode,
    fonts,
    foundation::error::InsigniaResult,
    input::{self, ImageKind, OutputTarget, TextPair},
    raster,
    scene,
    text::TextShaper,
};

/// Engine input: the two text sides plus the output target.
#[derive(Clone, Debug)]
pub struct DrawOptions {
    pub text: TextPair,
    pub output: OutputTarget,
}

/// Result of a successful render call.
#[derive(Clone, Debug)]
pub enum DrawOutput {
    /// File mode: the artifact was written and confirmed present.
    Written(PathBuf),
    /// Stream mode: the encoded image bytes.
    Bytes(Vec<u8>),
}

/// Render one mark, end to end.
///
/// Validation (output extension, empty text) and the canvas-width safety
/// bound all fail before any rasterization work. Each call is fully
/// self-contained; the only process-wide state is the one-time font
/// registration.
#[tracing::instrument(skip(opts, cfg), fields(left = %opts.text.left, right = %opts.text.right))]
pub fn draw(opts: &DrawOptions, cfg: &RenderConfig) -> InsigniaResult<DrawOutput> {
    cfg.validate()?;
    let kind = opts.output.kind()?;
    let text = input::normalize_pair(&opts.text)?;

    let library = fonts::font_library(&cfg.fonts_dir())?;
    let mut shaper = TextShaper::new(library)?;
    let decorations = decor::load_decorations(&cfg.images_dir())?;

    let plan = scene::plan_scene(&text, &mut shaper, &decorations, cfg)?;
    let frame = raster::rasterize(&plan)?;

    match &opts.output {
        OutputTarget::File(path) => {
            encode::write_to_path(&frame, path, kind, cfg.jpeg_quality)?;
            tracing::debug!(path = %path.display(), "mark written");
            Ok(DrawOutput::Written(path.clone()))
        }
        OutputTarget::Stream(_) => {
            let bytes = encode::encode_frame(&frame, kind, cfg.jpeg_quality)?;
            Ok(DrawOutput::Bytes(bytes))
        }
    }
}

/// File-mode convenience wrapper; returns the confirmed output path.
pub fn draw_to_file(
    left: &str,
    right: &str,
    path: impl Into<PathBuf>,
    cfg: &RenderConfig,
) -> InsigniaResult<PathBuf> {
    let path = path.into();
    let out = draw(
        &DrawOptions {
            text: TextPair {
                left: left.to_string(),
                right: right.to_string(),
            },
            output: OutputTarget::File(path),
        },
        cfg,
    )?;
    match out {
        DrawOutput::Written(p) => Ok(p),
        DrawOutput::Bytes(_) => unreachable!("file target produced bytes"),
    }
}

/// Stream-mode convenience wrapper; returns the encoded image bytes.
pub fn draw_to_vec(
    left: &str,
    right: &str,
    kind: ImageKind,
    cfg: &RenderConfig,
) -> InsigniaResult<Vec<u8>> {
    let out = draw(
        &DrawOptions {
            text: TextPair {
                left: left.to_string(),
                right: right.to_string(),
            },
            output: OutputTarget::Stream(kind),
        },
        cfg,
    )?;
    match out {
        DrawOutput::Bytes(bytes) => Ok(bytes),
        DrawOutput::Written(_) => unreachable!("stream target produced a file"),
    }
}

/// Stream-mode render piped straight into `writer` (e.g. an HTTP response
/// body).
pub fn draw_to_writer(
    left: &str,
    right: &str,
    kind: ImageKind,
    cfg: &RenderConfig,
    writer: &mut dyn Write,
) -> InsigniaResult<()> {
    let bytes = draw_to_vec(left, right, kind, cfg)?;
    writer
        .write_all(&bytes)
        .map_err(|e| anyhow::Error::new(e).context("pipe encoded image"))?;
    Ok(())
}
