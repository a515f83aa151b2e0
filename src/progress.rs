//! Counter label and progress bar.
//!
//! Each counter owns a horizontal band of the screen starting at
//! `number * band_height`. The label is drawn at the top of the band and the
//! bar inside it; the bar wraps every [`PROGRESS_MODULUS`] counts.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyleBuilder},
    pixelcolor::{BinaryColor, Rgb565},
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};
use heapless::String;

use crate::config::{PROGRESS_BAR_WIDTH, PROGRESS_MODULUS};
use crate::shared::CounterId;

/// "count1: " plus up to ten digits.
const LABEL_LEN: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressPalette<C> {
    pub background: C,
    pub text: C,
    pub bars: [C; 2],
}

impl ProgressPalette<Rgb565> {
    /// White screen, black text, red bar for counter 1 and blue for 2.
    pub const fn reference() -> Self {
        Self {
            background: Rgb565::WHITE,
            text: Rgb565::BLACK,
            bars: [Rgb565::RED, Rgb565::BLUE],
        }
    }
}

impl ProgressPalette<BinaryColor> {
    pub const fn monochrome() -> Self {
        Self {
            background: BinaryColor::Off,
            text: BinaryColor::On,
            bars: [BinaryColor::On, BinaryColor::On],
        }
    }
}

impl<C: Copy> ProgressPalette<C> {
    fn bar(&self, id: CounterId) -> C {
        match id {
            CounterId::One => self.bars[0],
            CounterId::Two => self.bars[1],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressLayout {
    pub label_x: i32,
    pub bar_x: i32,
    pub bar_width: u32,
    pub band_height: u32,
    /// Distance from the top of the band to the first bar row.
    pub bar_offset: u32,
    pub bar_height: u32,
}

impl ProgressLayout {
    /// Label and bar side by side on a one-line band, bar at x = 200.
    pub const fn reference(font: &MonoFont<'_>) -> Self {
        let line = font.character_size.height;
        Self {
            label_x: 2,
            bar_x: 200,
            bar_width: PROGRESS_BAR_WIDTH,
            band_height: line,
            bar_offset: 0,
            bar_height: line.saturating_sub(2),
        }
    }

    /// Label above bar on a two-line band, for 128x64 panels.
    pub const fn compact(font: &MonoFont<'_>) -> Self {
        let line = font.character_size.height;
        Self {
            label_x: 2,
            bar_x: 2,
            bar_width: PROGRESS_BAR_WIDTH,
            band_height: 2 * line,
            bar_offset: line + 1,
            bar_height: line.saturating_sub(3),
        }
    }

    fn band_top(&self, id: CounterId) -> i32 {
        (id.number() as u32 * self.band_height) as i32
    }
}

#[derive(Clone, Copy)]
pub struct ProgressRenderer<C> {
    font: &'static MonoFont<'static>,
    palette: ProgressPalette<C>,
    layout: ProgressLayout,
}

impl<C: PixelColor> ProgressRenderer<C> {
    pub const fn new(
        font: &'static MonoFont<'static>,
        palette: ProgressPalette<C>,
        layout: ProgressLayout,
    ) -> Self {
        Self {
            font,
            palette,
            layout,
        }
    }

    pub fn layout(&self) -> &ProgressLayout {
        &self.layout
    }

    /// Number of bar pixels drawn in the counter color for `value`.
    ///
    /// The left edge pixel is always filled, so a value of zero shows one.
    pub fn filled_width(&self, value: u32) -> u32 {
        let width = self.layout.bar_width;
        let wrapped = value % PROGRESS_MODULUS;
        (wrapped * width / PROGRESS_MODULUS + 1).min(width)
    }

    /// Blank the whole screen with the background color.
    pub fn clear<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        target.clear(self.palette.background)
    }

    pub fn render<D>(&self, target: &mut D, id: CounterId, value: u32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let top = self.layout.band_top(id);

        let mut label: String<LABEL_LEN> = String::new();
        // Always fits: 8 characters of prefix and at most 10 digits.
        let _ = write!(label, "count{}: {:09}", id.number(), value);

        let style = MonoTextStyleBuilder::new()
            .font(self.font)
            .text_color(self.palette.text)
            .background_color(self.palette.background)
            .build();
        Text::with_baseline(&label, Point::new(self.layout.label_x, top), style, Baseline::Top)
            .draw(target)?;

        let filled = self.filled_width(value);
        let bar_top = top + self.layout.bar_offset as i32;
        let bar_height = self.layout.bar_height;
        target.fill_solid(
            &Rectangle::new(
                Point::new(self.layout.bar_x, bar_top),
                Size::new(filled, bar_height),
            ),
            self.palette.bar(id),
        )?;
        target.fill_solid(
            &Rectangle::new(
                Point::new(self.layout.bar_x + filled as i32, bar_top),
                Size::new(self.layout.bar_width - filled, bar_height),
            ),
            self.palette.background,
        )
    }
}
