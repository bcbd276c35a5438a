//! Image ingestion for the product form.
//!
//! Every uploaded file goes through the same pipeline before it reaches
//! the catalog store: type and size checks, decode, downscale to at most
//! 800px wide, JPEG re-encode at quality 80, and finally a base64 data
//! URL. The store holds no binary blobs, so the data URL is the payload.
//!
//! Files are processed sequentially and independently: a rejected file
//! produces a warning and the remaining files still go through.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use maos_de_fada_core::ImageData;

/// Maximum accepted upload size per file (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Images wider than this are downscaled, preserving aspect ratio.
pub const MAX_IMAGE_WIDTH: u32 = 800;

/// JPEG re-encode quality.
pub const JPEG_QUALITY: u8 = 80;

/// Errors that reject a single uploaded file.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The MIME type does not indicate an image.
    #[error("O arquivo \"{0}\" não é uma imagem válida!")]
    NotAnImage(String),

    /// The file exceeds [`MAX_IMAGE_BYTES`].
    #[error("A imagem \"{0}\" é muito grande! Máximo 5MB por imagem.")]
    TooLarge(String),

    /// The bytes could not be decoded as an image.
    #[error("Não foi possível ler a imagem \"{0}\"")]
    Decode(String, #[source] image::ImageError),

    /// Re-encoding the processed image failed.
    #[error("Não foi possível processar a imagem \"{0}\"")]
    Encode(String, #[source] image::ImageError),
}

/// An uploaded file as it arrives from the multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Validate, downscale and re-encode one uploaded file.
///
/// # Errors
///
/// Returns an [`ImageError`] naming the file when it is rejected or
/// cannot be processed. The caller decides whether to abort or continue
/// with the remaining files.
pub fn process_image(file: &UploadedFile) -> Result<ImageData, ImageError> {
    let is_image = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"));
    if !is_image {
        return Err(ImageError::NotAnImage(file.file_name.clone()));
    }

    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge(file.file_name.clone()));
    }

    let decoded = image::load_from_memory(&file.bytes)
        .map_err(|e| ImageError::Decode(file.file_name.clone(), e))?;

    let (width, height) = (decoded.width(), decoded.height());
    let resized = if width > MAX_IMAGE_WIDTH {
        let new_height = u32::try_from(
            u64::from(height) * u64::from(MAX_IMAGE_WIDTH) / u64::from(width.max(1)),
        )
        .unwrap_or(height)
        .max(1);
        decoded.resize_exact(MAX_IMAGE_WIDTH, new_height, FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG has no alpha channel; flatten before encoding
    let rgb = resized.to_rgb8();
    let mut encoded = Vec::new();
    let mut cursor = Cursor::new(&mut encoded);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ImageError::Encode(file.file_name.clone(), e))?;

    debug!(
        file = %file.file_name,
        original = %format!("{width}x{height}"),
        resized = %format!("{}x{}", rgb.width(), rgb.height()),
        bytes = encoded.len(),
        "processed product image"
    );

    Ok(ImageData::new(format!(
        "data:image/jpeg;base64,{}",
        BASE64.encode(&encoded)
    )))
}

/// Process a batch of uploads sequentially.
///
/// Rejected files become per-file warning strings; accepted files come
/// back in upload order.
#[must_use]
pub fn ingest_files(files: &[UploadedFile]) -> (Vec<ImageData>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut warnings = Vec::new();

    for file in files {
        match process_image(file) {
            Ok(image) => accepted.push(image),
            Err(e) => {
                tracing::warn!(file = %file.file_name, "rejected upload: {e}");
                warnings.push(format!("❌ {e}"));
            }
        }
    }

    (accepted, warnings)
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageFormat, RgbImage};

    use super::*;

    fn png_upload(name: &str, width: u32, height: u32) -> UploadedFile {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 80, 200]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encodes");
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes,
        }
    }

    fn decode_data_url(image: &ImageData) -> DynamicImage {
        let data = image
            .as_str()
            .strip_prefix("data:image/jpeg;base64,")
            .expect("jpeg data url");
        let bytes = BASE64.decode(data).expect("valid base64");
        image::load_from_memory(&bytes).expect("decodes")
    }

    #[test]
    fn wide_image_is_downscaled_to_800_with_proportional_height() {
        let upload = png_upload("grande.png", 1600, 1200);
        let processed = process_image(&upload).expect("accepted");

        let decoded = decode_data_url(&processed);
        assert_eq!(decoded.width(), 800);
        assert_eq!(decoded.height(), 600);
    }

    #[test]
    fn narrow_image_keeps_its_dimensions() {
        let upload = png_upload("pequena.png", 400, 300);
        let processed = process_image(&upload).expect("accepted");

        let decoded = decode_data_url(&processed);
        assert_eq!(decoded.width(), 400);
        assert_eq!(decoded.height(), 300);
    }

    #[test]
    fn non_image_mime_is_rejected() {
        let upload = UploadedFile {
            file_name: "nota.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(
            process_image(&upload),
            Err(ImageError::NotAnImage(_))
        ));
    }

    #[test]
    fn oversized_file_is_rejected_before_decoding() {
        let upload = UploadedFile {
            file_name: "enorme.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0; MAX_IMAGE_BYTES + 1],
        };
        assert!(matches!(
            process_image(&upload),
            Err(ImageError::TooLarge(_))
        ));
    }

    #[test]
    fn batch_ingest_skips_rejected_files_and_keeps_the_rest() {
        let files = vec![
            png_upload("ok-1.png", 100, 100),
            UploadedFile {
                file_name: "nota.txt".to_string(),
                content_type: Some("text/plain".to_string()),
                bytes: vec![1],
            },
            png_upload("ok-2.png", 100, 100),
        ];

        let (accepted, warnings) = ingest_files(&files);
        assert_eq!(accepted.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nota.txt"));
    }
}
