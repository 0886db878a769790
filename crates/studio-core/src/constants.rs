//! Application-wide constants for design-submission image generation.

/// Maximum size (in pixels) for the tiny presentations of preview images.
pub const TINY_IMAGE_SIZE: u32 = 120;

/// Maximum size (in pixels) for the small presentations of preview images.
pub const SMALL_IMAGE_SIZE: u32 = 300;

/// Maximum size (in pixels) for the medium presentations of preview images.
pub const MEDIUM_IMAGE_SIZE: u32 = 555;

/// Image type IDs for the non-watermarked gallery, paired with
/// [`GALLERY_PLAIN_IMAGE_SIZES`] by position.
pub const GALLERY_PLAIN_IMAGE_TYPE_IDS: [i64; 4] = [25, 26, 27, 28];

/// Maximum sizes of the non-watermarked gallery images. `None` keeps the
/// original image dimensions.
pub const GALLERY_PLAIN_IMAGE_SIZES: [Option<u32>; 4] = [
    Some(TINY_IMAGE_SIZE),
    Some(SMALL_IMAGE_SIZE),
    Some(MEDIUM_IMAGE_SIZE),
    None,
];

/// Image type IDs for the watermarked gallery, paired with
/// [`GALLERY_WATERMARKED_IMAGE_SIZES`] by position.
pub const GALLERY_WATERMARKED_IMAGE_TYPE_IDS: [i64; 3] = [29, 30, 31];

/// Maximum sizes of the watermarked gallery images.
pub const GALLERY_WATERMARKED_IMAGE_SIZES: [Option<u32>; 3] =
    [Some(SMALL_IMAGE_SIZE), Some(MEDIUM_IMAGE_SIZE), None];

/// Challenge category for which image file generation is skipped entirely
/// (Wireframes challenges carry no preview imagery).
pub const WIREFRAMES_CATEGORY_ID: i64 = 18;

/// File type ID of ZIP archives in the file-type reference table.
pub const ZIP_ARCHIVE_TYPE_ID: i64 = 14;

/// File type ID of JAR archives in the file-type reference table.
pub const JAR_ARCHIVE_TYPE_ID: i64 = 16;

/// Metadata-store sequence used to allocate path IDs.
pub const PATH_SEQUENCE: &str = "PATH_SEQ";

/// Metadata-store sequence used to allocate image IDs.
pub const IMAGE_SEQUENCE: &str = "IMAGE_SEQ";
