//! PNG encoding for rendered plots.
//!
//! Flat-shaded figures (heatmaps without antialiased text) often fit in a
//! 256-entry palette and are written as indexed PNGs; anything richer is
//! written as 8-bit RGBA.

use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use tiny_skia::Pixmap;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Pixel count above which palette extraction runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 4096;

type Rgba = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorType {
    Indexed = 3,
    Rgba = 6,
}

impl ColorType {
    fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Indexed => 1,
            ColorType::Rgba => 4,
        }
    }
}

/// Encode a tiny-skia pixmap as PNG.
///
/// Pixmaps hold premultiplied alpha; PNG wants straight alpha, so every
/// pixel is demultiplied first.
pub fn encode_pixmap(pixmap: &Pixmap) -> Result<Vec<u8>, String> {
    let pixels: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    create_png_auto(&pixels, pixmap.width() as usize, pixmap.height() as usize)
}

/// Encode straight-alpha RGBA bytes, choosing indexed output when possible.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "pixel buffer has {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        ));
    }

    let palette = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

#[inline(always)]
fn pack(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let key = pack(px);
        let index = match lookup.get(&key) {
            Some(&i) => i,
            None => {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push(key.to_le_bytes());
                lookup.insert(key, i);
                i
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Collect distinct colors per rayon chunk, merge, then index in parallel.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let pixels_per_chunk = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    let distinct: Vec<u32> = pixels
        .par_chunks(pixels_per_chunk * 4)
        .flat_map_iter(|chunk| {
            let mut seen: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                seen.insert(pack(px), ());
                if seen.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            seen.into_keys()
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = Vec::with_capacity(MAX_PALETTE_SIZE);
    for key in distinct {
        if lookup.contains_key(&key) {
            continue;
        }
        if palette.len() == MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(key, palette.len() as u8);
        palette.push(key.to_le_bytes());
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack(px)).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

/// Indexed PNG (color type 3), with a tRNS chunk when any entry is translucent.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[Rgba],
    indices: &[u8],
) -> Result<Vec<u8>, String> {
    let mut png = start_png(width, height, ColorType::Indexed);

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    finish_png(png, indices, width, height, ColorType::Indexed)
}

/// Truecolor PNG with alpha (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    let png = start_png(width, height, ColorType::Rgba);
    finish_png(png, pixels, width, height, ColorType::Rgba)
}

fn start_png(width: usize, height: usize, color_type: ColorType) -> Vec<u8> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(color_type as u8);
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    write_chunk(&mut png, b"IHDR", &ihdr);
    png
}

fn finish_png(
    mut png: Vec<u8>,
    data: &[u8],
    width: usize,
    height: usize,
    color_type: ColorType,
) -> Result<Vec<u8>, String> {
    let idat = deflate_scanlines(data, width * color_type.bytes_per_pixel(), height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Prefix each scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes.max(1)).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    encoder.finish()
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 0, 0, 255,
        ];
        let (palette, indices) = extract_palette_sequential(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_parallel_matches_sequential_palette_size() {
        let mut pixels = Vec::new();
        for i in 0..(128 * 128) {
            let v = (i % 17) as u8 * 10;
            pixels.extend_from_slice(&[v, v, 255 - v, 255]);
        }
        let (seq_palette, _) = extract_palette_sequential(&pixels).unwrap();
        let (par_palette, par_indices) = extract_palette_parallel(&pixels).unwrap();
        assert_eq!(seq_palette.len(), 17);
        assert_eq!(par_palette.len(), 17);
        for (px, &idx) in pixels.chunks_exact(4).zip(&par_indices) {
            assert_eq!(&par_palette[idx as usize][..], px);
        }
    }

    #[test]
    fn test_too_many_colors_has_no_palette() {
        let mut pixels = Vec::new();
        for i in 0..300u32 {
            pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 0, 255]);
        }
        assert!(extract_palette_sequential(&pixels).is_none());
    }

    #[test]
    fn test_indexed_png_has_plte() {
        let pixels = [0u8, 0, 0, 255, 255, 255, 255, 255];
        let png = create_png_auto(&pixels, 2, 1).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert_eq!(png[25], ColorType::Indexed as u8);
        assert!(png.windows(4).any(|w| w == b"PLTE"));
        assert!(!png.windows(4).any(|w| w == b"tRNS"));
    }

    #[test]
    fn test_buffer_size_is_checked() {
        assert!(create_png_auto(&[0u8; 12], 2, 2).is_err());
    }

    #[test]
    fn test_encode_pixmap_demultiplies() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(200, 100, 50, 128));
        let png = encode_pixmap(&pixmap).unwrap();
        assert!(png.windows(4).any(|w| w == b"tRNS"));
        assert!(png.ends_with(&[0xAE, 0x42, 0x60, 0x82]));
    }
}
