//! In-memory stand-ins for the board used by unit tests.

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::VecDeque;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_hal::digital::PinState;
use embedded_hal_async::delay::DelayNs;

use crate::hardware::traits::{Button, Led};

/// RGB frame buffer that remembers untouched pixels.
pub struct Canvas {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Canvas {
    /// Color of a pixel nothing has drawn to.
    pub const UNSET: Rgb565 = Rgb565::new(3, 7, 11);

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![Self::UNSET; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Rgb565 {
        self.pixels[(y as u32 * self.size.width + x as u32) as usize]
    }

    pub fn count_in(&self, x: i32, y: i32, width: u32, height: u32, color: Rgb565) -> usize {
        let mut count = 0;
        for py in y..y + height as i32 {
            for px in x..x + width as i32 {
                if self.pixel(px, py) == color {
                    count += 1;
                }
            }
        }
        count
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.size.width
                && (point.y as u32) < self.size.height
            {
                let index = point.y as u32 * self.size.width + point.x as u32;
                self.pixels[index as usize] = color;
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately and records every wait.
#[derive(Default)]
pub struct RecordingDelay {
    waits: Vec<u32>,
}

impl RecordingDelay {
    pub fn waits_ms(&self) -> &[u32] {
        &self.waits
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits.push(ms);
    }
}

/// Delay that gives other futures one turn before returning.
#[derive(Default)]
pub struct YieldingDelay;

impl DelayNs for YieldingDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        embassy_futures::yield_now().await;
    }

    async fn delay_ms(&mut self, _ms: u32) {
        embassy_futures::yield_now().await;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    On,
    Off,
    Wait(u32),
}

/// Ordered log of LED writes and delays.
#[derive(Default)]
pub struct Journal {
    entries: RefCell<Vec<Entry>>,
}

impl Journal {
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    fn push(&self, entry: Entry) {
        self.entries.borrow_mut().push(entry);
    }
}

pub struct JournalLed<'a>(pub &'a Journal);

impl Led for JournalLed<'_> {
    fn on(&mut self) {
        self.0.push(Entry::On);
    }

    fn off(&mut self) {
        self.0.push(Entry::Off);
    }
}

pub struct JournalDelay<'a>(pub &'a Journal);

impl DelayNs for JournalDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.push(Entry::Wait(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.push(Entry::Wait(ms));
    }
}

/// Button replaying a fixed list of samples, released once it runs out.
#[derive(Default)]
pub struct ScriptedButton {
    samples: RefCell<VecDeque<PinState>>,
}

impl ScriptedButton {
    /// `0` is pressed, `1` is released.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self {
            samples: RefCell::new(
                bits.iter()
                    .map(|bit| PinState::from(*bit != 0))
                    .collect(),
            ),
        }
    }
}

impl Button for ScriptedButton {
    fn level(&self) -> PinState {
        self.samples
            .borrow_mut()
            .pop_front()
            .unwrap_or(PinState::High)
    }
}
