// ============================================================
// Layer 4 — Fashion-MNIST Dataset
// ============================================================
// Downloads the Fashion-MNIST split files, caches them on
// local storage, parses the IDX binary format and exposes the
// result through Burn's Dataset trait so the DataLoader can
// call .get(index) and .len() on it.
//
// The IDX format (same layout as classic MNIST):
//   images: u32 magic (2051) | u32 count | u32 rows | u32 cols
//           followed by count*rows*cols pixel bytes
//   labels: u32 magic (2049) | u32 count
//           followed by count label bytes
//   All integers are big-endian.
//
// The dataset is tiny, so both splits are held in memory:
//   train images (u8): 28 * 28 * 60000 ≈ 47 MB
//   test  images (u8): 28 * 28 * 10000 ≈  8 MB
//
// Reference: Xiao et al. (2017) Fashion-MNIST
//            Burn Book §4 (Datasets)

use std::fs::{self, create_dir_all};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use burn::data::dataset::{Dataset, InMemDataset};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

// Mirror of the Zalando Research dataset files
const URL: &str =
    "https://raw.githubusercontent.com/zalandoresearch/fashion-mnist/master/data/fashion/";
const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// Image width in pixels
pub const WIDTH: usize = 28;
/// Image height in pixels
pub const HEIGHT: usize = 28;
/// Flattened image length — the model's input dimension
pub const PIXELS: usize = WIDTH * HEIGHT;

/// One labelled image. Pixel values are raw intensities in
/// 0.0..=255.0 — normalization happens in the batcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageItem {
    /// Image as a 2D array of floats
    pub image: [[f32; WIDTH]; HEIGHT],

    /// Raw class label (0..=9)
    pub label: u8,
}

/// The Fashion-MNIST dataset: 70,000 28x28 grayscale images of
/// clothing items in 10 classes — 60,000 train, 10,000 test.
pub struct FashionMnistDataset {
    dataset: InMemDataset<ImageItem>,
}

impl Dataset<ImageItem> for FashionMnistDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.dataset.get(index)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl FashionMnistDataset {
    /// The training partition (60,000 images)
    pub fn train() -> Result<Self> {
        Self::new(TRAIN_IMAGES, TRAIN_LABELS)
    }

    /// The held-out test partition (10,000 images)
    pub fn test() -> Result<Self> {
        Self::new(TEST_IMAGES, TEST_LABELS)
    }

    fn new(images_file: &str, labels_file: &str) -> Result<Self> {
        let cache_dir = dataset_cache_dir()?;
        let images_path = download_file(images_file, &cache_dir)?;
        let labels_path = download_file(labels_file, &cache_dir)?;

        let raw_images = fs::read(&images_path)
            .with_context(|| format!("Cannot read '{}'", images_path.display()))?;
        let raw_labels = fs::read(&labels_path)
            .with_context(|| format!("Cannot read '{}'", labels_path.display()))?;

        let images = parse_idx_images(&raw_images)?;
        let labels = parse_idx_labels(&raw_labels)?;

        if images.len() != labels.len() {
            bail!(
                "Image/label count mismatch: {} images vs {} labels",
                images.len(),
                labels.len()
            );
        }

        let items: Vec<ImageItem> = images
            .into_iter()
            .zip(labels)
            .map(|(pixels, label)| pixels_to_item(&pixels, label))
            .collect();

        tracing::info!("Loaded {} items from '{}'", items.len(), images_file);

        Ok(Self {
            dataset: InMemDataset::new(items),
        })
    }
}

/// Cache directory for the downloaded split files,
/// e.g. ~/.cache/fashion-classifier on Linux.
fn dataset_cache_dir() -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .context("Could not determine the user cache directory")?
        .join("fashion-classifier");
    create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory '{}'", dir.display()))?;
    Ok(dir)
}

/// Download one gzip-compressed dataset file and store it
/// decompressed in the cache directory. Skips the download
/// when the file is already cached.
fn download_file(name: &str, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = dest_dir.join(name);
    if file_name.exists() {
        tracing::debug!("Using cached '{}'", file_name.display());
        return Ok(file_name);
    }

    let url = format!("{URL}{name}.gz");
    tracing::info!("Downloading {url}");

    let response = reqwest::blocking::get(&url)
        .with_context(|| format!("Failed to download '{url}'"))?
        .error_for_status()
        .with_context(|| format!("Server rejected request for '{url}'"))?;
    let compressed = response
        .bytes()
        .with_context(|| format!("Failed to read response body for '{url}'"))?;

    let mut decoder = GzDecoder::new(&compressed[..]);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .with_context(|| format!("Failed to decompress '{name}.gz'"))?;

    fs::write(&file_name, decompressed)
        .with_context(|| format!("Failed to write '{}'", file_name.display()))?;

    Ok(file_name)
}

/// Parse an IDX image file into one pixel vector per image.
fn parse_idx_images(raw: &[u8]) -> Result<Vec<Vec<u8>>> {
    if raw.len() < 16 {
        bail!("Image file too short to contain an IDX header");
    }
    let magic = read_be_u32(raw, 0);
    if magic != IMAGES_MAGIC {
        bail!("Unexpected image file magic number {magic} (expected {IMAGES_MAGIC})");
    }

    let count = read_be_u32(raw, 4) as usize;
    let rows = read_be_u32(raw, 8) as usize;
    let cols = read_be_u32(raw, 12) as usize;
    if rows != HEIGHT || cols != WIDTH {
        bail!("Unexpected image dimensions {rows}x{cols} (expected {HEIGHT}x{WIDTH})");
    }

    let pixels = &raw[16..];
    if pixels.len() != count * PIXELS {
        bail!(
            "Image file truncated: {} pixel bytes for {} declared images",
            pixels.len(),
            count
        );
    }

    Ok(pixels.chunks(PIXELS).map(|chunk| chunk.to_vec()).collect())
}

/// Parse an IDX label file into one byte per image.
fn parse_idx_labels(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() < 8 {
        bail!("Label file too short to contain an IDX header");
    }
    let magic = read_be_u32(raw, 0);
    if magic != LABELS_MAGIC {
        bail!("Unexpected label file magic number {magic} (expected {LABELS_MAGIC})");
    }

    let count = read_be_u32(raw, 4) as usize;
    let labels = &raw[8..];
    if labels.len() != count {
        bail!(
            "Label file truncated: {} label bytes for {} declared labels",
            labels.len(),
            count
        );
    }

    Ok(labels.to_vec())
}

fn read_be_u32(raw: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([raw[offset], raw[offset + 1], raw[offset + 2], raw[offset + 3]])
}

/// Convert one flat pixel vector into a 2D image item.
fn pixels_to_item(pixels: &[u8], label: u8) -> ImageItem {
    debug_assert_eq!(pixels.len(), PIXELS);

    let mut image = [[0f32; WIDTH]; HEIGHT];
    for (i, pixel) in pixels.iter().enumerate() {
        let x = i % WIDTH;
        let y = i / WIDTH;
        image[y][x] = *pixel as f32;
    }

    ImageItem { image, label }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Build a valid IDX image file in memory with `count`
    /// images, filling every image with its own index value.
    fn synthetic_image_file(count: usize) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
        raw.extend_from_slice(&(count as u32).to_be_bytes());
        raw.extend_from_slice(&(HEIGHT as u32).to_be_bytes());
        raw.extend_from_slice(&(WIDTH as u32).to_be_bytes());
        for i in 0..count {
            raw.extend(std::iter::repeat(i as u8).take(PIXELS));
        }
        raw
    }

    fn synthetic_label_file(labels: &[u8]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        raw.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        raw.extend_from_slice(labels);
        raw
    }

    #[test]
    fn test_parse_images() {
        let raw = synthetic_image_file(3);
        let images = parse_idx_images(&raw).unwrap();
        assert_eq!(images.len(), 3);
        assert!(images[2].iter().all(|&p| p == 2));
    }

    #[test]
    fn test_parse_labels() {
        let raw = synthetic_label_file(&[0, 9, 4]);
        let labels = parse_idx_labels(&raw).unwrap();
        assert_eq!(labels, vec![0, 9, 4]);
    }

    #[test]
    fn test_rejects_wrong_magic() {
        let mut raw = synthetic_image_file(1);
        raw[3] = 0; // corrupt the magic number
        assert!(parse_idx_images(&raw).is_err());
    }

    #[test]
    fn test_rejects_truncated_pixels() {
        let mut raw = synthetic_image_file(2);
        raw.truncate(raw.len() - 1);
        assert!(parse_idx_images(&raw).is_err());
    }

    #[test]
    fn test_rejects_truncated_labels() {
        let mut raw = synthetic_label_file(&[1, 2, 3]);
        raw.truncate(raw.len() - 1);
        assert!(parse_idx_labels(&raw).is_err());
    }

    #[test]
    fn test_pixels_to_item_layout() {
        // Pixel at flat index 29 is row 1, column 1
        let mut pixels = vec![0u8; PIXELS];
        pixels[WIDTH + 1] = 200;
        let item = pixels_to_item(&pixels, 5);
        assert_eq!(item.image[1][1], 200.0);
        assert_eq!(item.image[0][0], 0.0);
        assert_eq!(item.label, 5);
    }
}
