//! Sprite rendering.
//!
//! Sprites are drawn once per frame at VBlank entry, walking OAM from
//! entry 63 down to 0 so that lower-index (higher priority) sprites
//! overwrite. Transparency is pattern value 0; the behind-background
//! attribute keeps a sprite underneath anything that is not the backdrop
//! colour.

use crate::oam::SPRITE_COUNT;
use crate::ppu::{FRAME_HEIGHT, FRAME_WIDTH, Ppu};
use crate::vram::{IMAGE_PALETTE, SPRITE_PALETTE};

impl Ppu {
    /// Render all 64 sprites into the framebuffer.
    pub(crate) fn render_sprite_frame(&mut self) {
        if !self.mask.show_sprites() {
            return;
        }

        let height = u16::from(self.ctrl.sprite_height());
        let backdrop = self.vram.read(IMAGE_PALETTE) & 0x3F;

        for index in (0..SPRITE_COUNT).rev() {
            let sprite = self.oam.sprite(index);

            for row in 0..height {
                let y = usize::from(sprite.y) + usize::from(row);
                if y >= FRAME_HEIGHT {
                    break;
                }

                let fine_y = if sprite.attr.flip_vertical() {
                    height - 1 - row
                } else {
                    row
                };
                let pattern_addr = self.sprite_pattern_addr(sprite.tile, fine_y);
                let lo = self.vram.read(pattern_addr);
                let hi = self.vram.read(pattern_addr + 8);

                for px in 0..8usize {
                    let x = usize::from(sprite.x) + px;
                    if x >= FRAME_WIDTH {
                        break;
                    }

                    let bit = if sprite.attr.flip_horizontal() {
                        px
                    } else {
                        7 - px
                    };
                    let pattern = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
                    if pattern == 0 {
                        continue;
                    }
                    if sprite.attr.behind_background() && self.framebuffer[y][x] != backdrop {
                        continue;
                    }

                    let colour = self
                        .vram
                        .read(
                            SPRITE_PALETTE
                                + u16::from(sprite.attr.palette_set()) * 4
                                + u16::from(pattern),
                        )
                        & 0x3F;
                    self.framebuffer[y][x] = colour;
                }
            }
        }
    }

    /// Pattern address for one row of a sprite. 8x8 sprites use the CTRL
    /// table select; 8x16 sprites take the table from tile bit 0 and
    /// spill into `tile | 1` for their lower half.
    fn sprite_pattern_addr(&self, tile: u8, fine_y: u16) -> u16 {
        if self.ctrl.sprite_height() == 16 {
            let table = u16::from(tile & 0x01) * 0x1000;
            let tile = u16::from(tile & 0xFE) + u16::from(fine_y >= 8);
            table + tile * 16 + (fine_y & 0x07)
        } else {
            self.ctrl.sprite_pattern_base() + u16::from(tile) * 16 + fine_y
        }
    }
}
