#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Software raster canvas for labyrinth adapters.
//!
//! [`Raster`] implements the engine's [`Canvas`] contract on an in-memory
//! RGBA8 image. Sprites are flat shapes; moving entities carry a lighter
//! notch on the side they face.

use labyrinth_core::{Block, BlockCoord, Canvas, Direction, PixelPoint, Sprite};
use thiserror::Error;

/// Number of bytes per raster pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// RGBA color with byte channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
    /// Alpha channel intensity.
    pub alpha: u8,
}

impl Color {
    /// Creates a new color from byte channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, u8::MAX)
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Channels in RGBA order.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; BYTES_PER_PIXEL] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

fn lighten_channel(channel: u8, amount: f32) -> u8 {
    let channel = f32::from(channel);
    (channel + (255.0 - channel) * amount).round() as u8
}

/// Colors used for every block and sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Empty blocks and erased areas.
    pub background: Color,
    /// Wall blocks.
    pub wall: Color,
    /// Living player body.
    pub player: Color,
    /// Hostile body.
    pub hostile: Color,
    /// Player after being caught.
    pub dead: Color,
    /// Queued waypoint markers.
    pub marker: Color,
    /// Maze exit.
    pub exit: Color,
    /// Victory frame drawn around the player.
    pub won: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(236, 232, 220),
            wall: Color::from_rgb_u8(52, 58, 74),
            player: Color::from_rgb_u8(38, 112, 196),
            hostile: Color::from_rgb_u8(196, 54, 48),
            dead: Color::from_rgb_u8(96, 96, 96),
            marker: Color::from_rgb_u8(64, 160, 96),
            exit: Color::from_rgb_u8(232, 184, 40),
            won: Color::from_rgb_u8(250, 214, 64),
        }
    }
}

/// Errors reported by the raster canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// A zero block size would produce an empty image.
    #[error("block size must be positive")]
    ZeroBlockSize,
    /// The raster would not fit in memory-addressable bounds.
    #[error("raster of {columns}x{rows} blocks at {block_size} px is too large")]
    TooLarge {
        /// Requested block columns.
        columns: u32,
        /// Requested block rows.
        rows: u32,
        /// Requested block size.
        block_size: u32,
    },
    /// A requested region extends past the raster.
    #[error("region {width}x{height} at ({x}, {y}) exceeds the raster")]
    RegionOutOfBounds {
        /// Left edge of the region.
        x: u32,
        /// Top edge of the region.
        y: u32,
        /// Width of the region.
        width: u32,
        /// Height of the region.
        height: u32,
    },
}

/// In-memory RGBA8 image of the whole maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    block_size: u32,
    palette: Palette,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a raster covering `columns` by `rows` blocks, painted with the background.
    pub fn new(columns: u32, rows: u32, block_size: u32) -> Result<Self, RenderingError> {
        Self::with_palette(columns, rows, block_size, Palette::default())
    }

    /// Creates a raster with custom colors.
    pub fn with_palette(
        columns: u32,
        rows: u32,
        block_size: u32,
        palette: Palette,
    ) -> Result<Self, RenderingError> {
        if block_size == 0 {
            return Err(RenderingError::ZeroBlockSize);
        }
        let too_large = RenderingError::TooLarge {
            columns,
            rows,
            block_size,
        };
        let width = columns.checked_mul(block_size).ok_or(too_large)?;
        let height = rows.checked_mul(block_size).ok_or(too_large)?;
        let length = usize::try_from(u64::from(width) * u64::from(height))
            .ok()
            .and_then(|count| count.checked_mul(BYTES_PER_PIXEL))
            .ok_or(too_large)?;

        let mut raster = Self {
            width,
            height,
            block_size,
            palette,
            pixels: vec![0; length],
        };
        raster.clear();
        Ok(raster)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixels in row-major order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Color of a single pixel, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let rgba = &self.pixels[offset..offset + BYTES_PER_PIXEL];
        Some(Color::new(rgba[0], rgba[1], rgba[2], rgba[3]))
    }

    /// Copies a rectangular window of pixels in row-major RGBA8 order.
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u8>, RenderingError> {
        let out_of_bounds = RenderingError::RegionOutOfBounds {
            x,
            y,
            width,
            height,
        };
        let right = x.checked_add(width).ok_or(out_of_bounds)?;
        let bottom = y.checked_add(height).ok_or(out_of_bounds)?;
        if right > self.width || bottom > self.height {
            return Err(out_of_bounds);
        }

        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let mut copy = Vec::with_capacity(row_bytes * height as usize);
        for row in y..bottom {
            if let Some(start) = self.offset(x, row) {
                copy.extend_from_slice(&self.pixels[start..start + row_bytes]);
            }
        }
        Ok(copy)
    }

    /// Top-left corner of a `width` by `height` window centered on `center`.
    ///
    /// The window is shifted to stay inside the raster; a window larger than
    /// the raster starts at the origin.
    #[must_use]
    pub fn view_origin(&self, center: PixelPoint, width: u32, height: u32) -> (u32, u32) {
        (
            window_start(center.x, width, self.width),
            window_start(center.y, height, self.height),
        )
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        Some(index * BYTES_PER_PIXEL)
    }

    /// Fills a rectangle, clipping whatever falls outside the raster.
    fn fill_rect(&mut self, left: i32, top: i32, width: u32, height: u32, color: Color) {
        let clip = |start: i32, length: u32, limit: u32| {
            let end = (i64::from(start) + i64::from(length)).clamp(0, i64::from(limit)) as u32;
            let start = i64::from(start).clamp(0, i64::from(limit)) as u32;
            start..end
        };
        let columns = clip(left, width, self.width);
        let rgba = color.to_rgba();

        for y in clip(top, height, self.height) {
            for x in columns.clone() {
                if let Some(offset) = self.offset(x, y) {
                    self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
                }
            }
        }
    }

    fn fill_square(&mut self, center: PixelPoint, side: u32, color: Color) {
        let half = (side / 2) as i32;
        self.fill_rect(center.x - half, center.y - half, side, side, color);
    }

    fn draw_facing(&mut self, center: PixelPoint, direction: Direction, color: Color) {
        let quarter = (self.block_size / 4).max(1);
        self.fill_square(center, self.block_size * 3 / 4, color);

        let (dx, dy) = direction.offset();
        let reach = quarter as i32;
        let notch = PixelPoint::new(center.x + dx * reach, center.y + dy * reach);
        self.fill_square(notch, quarter, color.lighten(0.5));
    }

    fn draw_frame(&mut self, center: PixelPoint, color: Color) {
        let side = self.block_size;
        let thickness = (side / 8).max(1);
        let half = (side / 2) as i32;
        let (left, top) = (center.x - half, center.y - half);
        let far = side as i32 - thickness as i32;

        self.fill_rect(left, top, side, thickness, color);
        self.fill_rect(left, top + far, side, thickness, color);
        self.fill_rect(left, top, thickness, side, color);
        self.fill_rect(left + far, top, thickness, side, color);
    }
}

fn window_start(center: i32, window: u32, extent: u32) -> u32 {
    if window >= extent {
        return 0;
    }
    let start = i64::from(center) - i64::from(window / 2);
    start.clamp(0, i64::from(extent - window)) as u32
}

impl Canvas for Raster {
    fn clear(&mut self) {
        let rgba = self.palette.background.to_rgba();
        for pixel in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn fill_block(&mut self, coord: BlockCoord, block: Block) {
        let color = match block {
            Block::Empty => self.palette.background,
            Block::Wall => self.palette.wall,
        };
        let side = self.block_size;
        let left = coord.column().saturating_mul(side);
        let top = coord.row().saturating_mul(side);
        if let (Ok(left), Ok(top)) = (i32::try_from(left), i32::try_from(top)) {
            self.fill_rect(left, top, side, side, color);
        }
    }

    fn draw(&mut self, sprite: Sprite, center: PixelPoint) {
        let palette = self.palette;
        let side = self.block_size;
        match sprite {
            Sprite::Player(direction) => self.draw_facing(center, direction, palette.player),
            Sprite::Hostile(direction) => self.draw_facing(center, direction, palette.hostile),
            Sprite::DeadPlayer => self.fill_square(center, side * 3 / 4, palette.dead),
            Sprite::Marker => self.fill_square(center, (side / 4).max(1), palette.marker),
            Sprite::Exit => self.fill_square(center, side.saturating_sub(4).max(1), palette.exit),
            Sprite::Won => self.draw_frame(center, palette.won),
        }
    }

    fn erase(&mut self, center: PixelPoint) {
        let background = self.palette.background;
        self.fill_square(center, self.block_size, background);
    }
}
