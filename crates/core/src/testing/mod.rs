//! Testing utilities: a mock executor and in-memory audio/image fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use coverkit_core::testing::{fixtures, MockExecutor};
//!
//! std::fs::write(&path, fixtures::mp3_bytes())?;
//! fixtures::tag(&path, TagPatch { title: Some("Song".into()), ..Default::default() });
//! ```

mod mock_executor;

pub use mock_executor::MockExecutor;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io::Cursor;
    use std::path::Path;

    use image::codecs::jpeg::JpegEncoder;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    use crate::cover::CoverImage;
    use crate::metadata::{AdapterRegistry, MetadataError, TagPatch};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    /// PNG with a colour gradient.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(gradient(width, height))
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png fixture");
        out.into_inner()
    }

    /// Fully transparent PNG whose colour channels are black.
    pub fn transparent_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png fixture");
        out.into_inner()
    }

    /// Baseline JPEG with a colour gradient.
    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 90)
            .encode_image(&gradient(width, height))
            .expect("encode jpeg fixture");
        out
    }

    /// A cover wrapped the way adapters return it.
    pub fn cover(width: u32, height: u32) -> CoverImage {
        CoverImage::from_bytes(jpeg_bytes(width, height))
    }

    /// Untagged MPEG-1 Layer III stream: eight silent 128 kbps frames.
    pub fn mp3_bytes() -> Vec<u8> {
        const FRAME_LEN: usize = 417;
        let mut out = Vec::with_capacity(FRAME_LEN * 8);
        for _ in 0..8 {
            let mut frame = vec![0u8; FRAME_LEN];
            frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
            out.extend_from_slice(&frame);
        }
        out
    }

    /// Untagged FLAC stream holding only a STREAMINFO block.
    pub fn flac_bytes() -> Vec<u8> {
        let mut out = b"fLaC".to_vec();
        // Last metadata block, type 0 (STREAMINFO), 34 bytes.
        out.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
        out.extend_from_slice(&4096u16.to_be_bytes());
        out.extend_from_slice(&4096u16.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        let sample_rate: u64 = 44_100;
        let channels_minus_one: u64 = 1;
        let bits_minus_one: u64 = 15;
        let total_samples: u64 = 44_100;
        let packed = (sample_rate << 44) | (channels_minus_one << 41) | (bits_minus_one << 36) | total_samples;
        out.extend_from_slice(&packed.to_be_bytes());
        out.extend_from_slice(&[0u8; 16]);
        out
    }

    /// Minimal PCM WAV with no samples.
    pub fn wav_bytes() -> Vec<u8> {
        let mut fmt = Vec::new();
        fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
        fmt.extend_from_slice(&2u16.to_le_bytes()); // channels
        fmt.extend_from_slice(&44_100u32.to_le_bytes());
        fmt.extend_from_slice(&(44_100u32 * 4).to_le_bytes());
        fmt.extend_from_slice(&4u16.to_le_bytes());
        fmt.extend_from_slice(&16u16.to_le_bytes());

        let data = [0u8; 16];
        let mut body = b"WAVE".to_vec();
        body.extend_from_slice(b"fmt ");
        body.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
        body.extend_from_slice(&fmt);
        body.extend_from_slice(b"data");
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(&data);

        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    fn atom(name: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(name);
        out.extend_from_slice(body);
        out
    }

    /// Untagged M4A: `ftyp`, a `moov` holding only `mvhd`, then a small `mdat`.
    pub fn m4a_bytes() -> Vec<u8> {
        let mut ftyp = b"M4A ".to_vec();
        ftyp.extend_from_slice(&0u32.to_be_bytes());
        ftyp.extend_from_slice(b"M4A mp42isom");

        let mut mvhd = vec![0u8; 12]; // version, flags, creation and modification times
        mvhd.extend_from_slice(&1000u32.to_be_bytes()); // timescale
        mvhd.extend_from_slice(&0u32.to_be_bytes()); // duration
        mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate 1.0
        mvhd.extend_from_slice(&0x0100u16.to_be_bytes()); // volume 1.0
        mvhd.extend_from_slice(&[0u8; 10]);
        for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
            mvhd.extend_from_slice(&value.to_be_bytes());
        }
        mvhd.extend_from_slice(&[0u8; 24]);
        mvhd.extend_from_slice(&1u32.to_be_bytes()); // next track id

        let mut out = atom(b"ftyp", &ftyp);
        out.extend(atom(b"moov", &atom(b"mvhd", &mvhd)));
        out.extend(atom(b"mdat", &[0u8; 16]));
        out
    }

    fn ogg_crc(data: &[u8]) -> u32 {
        let mut crc = 0u32;
        for byte in data {
            crc ^= u32::from(*byte) << 24;
            for _ in 0..8 {
                crc = if crc & 0x8000_0000 != 0 {
                    (crc << 1) ^ 0x04c1_1db7
                } else {
                    crc << 1
                };
            }
        }
        crc
    }

    /// One Ogg page holding a single packet shorter than 255 bytes.
    fn ogg_page(header_type: u8, granule: u64, sequence: u32, packet: &[u8]) -> Vec<u8> {
        let mut page = b"OggS".to_vec();
        page.push(0);
        page.push(header_type);
        page.extend_from_slice(&granule.to_le_bytes());
        page.extend_from_slice(&0x436f_766bu32.to_le_bytes()); // stream serial
        page.extend_from_slice(&sequence.to_le_bytes());
        page.extend_from_slice(&[0u8; 4]);
        page.push(1);
        page.push(packet.len() as u8);
        page.extend_from_slice(packet);

        let crc = ogg_crc(&page);
        page[22..26].copy_from_slice(&crc.to_le_bytes());
        page
    }

    /// Untagged Ogg Opus stream: `OpusHead`, an empty `OpusTags` and one
    /// audio page.
    pub fn opus_bytes() -> Vec<u8> {
        let mut head = b"OpusHead".to_vec();
        head.push(1); // version
        head.push(2); // channels
        head.extend_from_slice(&312u16.to_le_bytes()); // pre-skip
        head.extend_from_slice(&48_000u32.to_le_bytes());
        head.extend_from_slice(&0i16.to_le_bytes()); // output gain
        head.push(0); // channel mapping family

        let vendor = b"coverkit";
        let mut tags = b"OpusTags".to_vec();
        tags.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        tags.extend_from_slice(vendor);
        tags.extend_from_slice(&0u32.to_le_bytes());

        let mut out = ogg_page(0x02, 0, 0, &head);
        out.extend(ogg_page(0x00, 0, 1, &tags));
        // One 20 ms silent stereo frame.
        out.extend(ogg_page(0x04, 312 + 960, 2, &[0xFC, 0xFF, 0xFE]));
        out
    }

    /// Writes `patch` into an existing audio file through the default adapters.
    pub fn tag(path: &Path, patch: TagPatch) -> Result<(), MetadataError> {
        AdapterRegistry::with_defaults()
            .for_path(path)?
            .write(path, &patch)
    }

    /// Creates `bytes` at `path`, then tags it.
    pub fn write_tagged(path: &Path, bytes: Vec<u8>, patch: TagPatch) -> Result<(), MetadataError> {
        std::fs::write(path, bytes)?;
        tag(path, patch)
    }

    /// Creates an MP3 at `path` carrying the given tags.
    pub fn write_tagged_mp3(
        path: &Path,
        track: Option<u32>,
        title: Option<&str>,
        album: Option<&str>,
        cover: Option<CoverImage>,
    ) -> Result<(), MetadataError> {
        write_tagged(
            path,
            mp3_bytes(),
            TagPatch {
                track_number: track,
                title: title.map(String::from),
                album: album.map(String::from),
                cover,
            },
        )
    }
}
