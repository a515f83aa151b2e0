//! Off-screen frame shared by the counter tasks.
//!
//! Counter tasks run at different priorities, so they draw into a plain
//! in-memory frame instead of the panel driver. The refresh task copies the
//! frame to the panel at its own pace.

use embedded_graphics::{
    framebuffer::{Framebuffer, buffer_size},
    image::Image,
    pixelcolor::{
        BinaryColor,
        raw::{BigEndian, RawU1},
    },
    prelude::*,
};

pub const FRAME_WIDTH: usize = 128;
pub const FRAME_HEIGHT: usize = 64;

/// 1 bit per pixel, sized for a 128x64 SSD1306.
pub type Frame = Framebuffer<
    BinaryColor,
    RawU1,
    BigEndian,
    FRAME_WIDTH,
    FRAME_HEIGHT,
    { buffer_size::<BinaryColor>(FRAME_WIDTH, FRAME_HEIGHT) },
>;

/// Copy the whole frame onto `target`, top-left aligned.
pub fn blit<D>(frame: &Frame, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Image::new(&frame.as_image(), Point::zero()).draw(target)?;
    Ok(())
}
