//! Headless capture: PNG screenshots.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use emu_core::Cpu;

use crate::Nes;
use crate::display::ColorDisplay;

/// Save the display as an 8-bit RGB PNG.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(display: &ColorDisplay, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), display.width(), display.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let format = display.format();
    let rgb: Vec<u8> = display
        .pixels()
        .iter()
        .flat_map(|&pixel| format.to_rgb888(pixel))
        .collect();

    writer.write_image_data(&rgb)?;
    Ok(())
}

/// Run `num_frames` frames with no buttons held, saving each as a PNG in
/// `dir/frames/`.
///
/// # Errors
///
/// Returns an error if frames cannot be saved.
pub fn record<C: Cpu>(
    nes: &mut Nes<C>,
    dir: &Path,
    num_frames: u32,
) -> Result<(), Box<dyn Error>> {
    let frames_dir = dir.join("frames");
    fs::create_dir_all(&frames_dir)?;

    for i in 1..=num_frames {
        nes.run_frame(0, 0);
        save_screenshot(nes.display(), &frames_dir.join(format!("{i:06}.png")))?;
    }

    log::info!("captured {num_frames} frames to {}", frames_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NesConfig;
    use crate::palette::ColorFormat;
    use emu_core::{BusDevice, FrameSink};
    use ricoh_ppu_2c02::{FB_HEIGHT, FB_WIDTH};

    struct Halted;

    impl Cpu for Halted {
        fn tick<B: BusDevice>(&mut self, _bus: &mut B) {}
        fn nmi(&mut self) {}
        fn reset(&mut self) {}
        fn pc(&self) -> u16 {
            0x8000
        }
    }

    #[test]
    fn screenshot_decodes_back_to_same_colours() {
        let mut display = ColorDisplay::new(ColorFormat::Rgb555);
        let mut indices = vec![0x0Fu8; FB_WIDTH * FB_HEIGHT];
        indices[0] = 0x30;
        display.frame_complete(&indices);

        let path = std::env::temp_dir().join(format!("nes-lockstep-{}.png", std::process::id()));
        save_screenshot(&display, &path).expect("write png");

        let decoder = png::Decoder::new(fs::File::open(&path).expect("open png"));
        let mut reader = decoder.read_info().expect("png header");
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("png frame");
        fs::remove_file(&path).ok();

        assert_eq!((info.width, info.height), (256, 240));
        assert_eq!(&buf[..3], &[0xFF, 0xFF, 0xFF]);
        assert_eq!(&buf[3..6], &[0, 0, 0]);
    }

    #[test]
    fn record_writes_one_numbered_png_per_frame() {
        let mut rom = vec![0u8; 16 + 0x4000];
        rom[0..4].copy_from_slice(b"NES\x1a");
        rom[4] = 1;
        let mut nes = Nes::new(&NesConfig::default(), Halted);
        assert!(nes.load_image(&rom));

        let dir = std::env::temp_dir().join(format!("nes-lockstep-record-{}", std::process::id()));
        record(&mut nes, &dir, 2).expect("record frames");

        let frames = dir.join("frames");
        let mut names: Vec<_> = fs::read_dir(&frames)
            .expect("frames dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let decoded = png::Decoder::new(fs::File::open(frames.join("000002.png")).expect("open png"))
            .read_info()
            .map(|reader| (reader.info().width, reader.info().height));
        fs::remove_dir_all(&dir).ok();

        assert_eq!(names, ["000001.png", "000002.png"]);
        assert_eq!(decoded.expect("png header"), (256, 240));
        assert_eq!(nes.frame_count(), 2);
    }
}
