use std::fmt;

use tracing::debug;

use crate::{ColorGrid, Rgb};

/// Glyph drawn by every text display; one glyph covers one pixel.
pub const GLYPH: char = '\u{2588}';

/// World units covered by one glyph at scale 1.
pub const GLYPH_SIZE: f64 = 0.125;

// Empirically tuned offsets that line the glyph's visual anchor up with the
// grid cell. Changing them shifts every generated installation.
const HORIZONTAL_NUDGE_DIVISOR: f64 = 2.5;
const VERTICAL_BASELINE: f64 = 1.875;
const VERTICAL_NUDGE: f64 = 0.08;

const IDENTITY_ROTATION: FloatList<4> = FloatList([0.0, 0.0, 0.0, 1.0]);

/// Fixed-size numeric vector printed in the game's literal syntax,
/// `[a,b,c]` with an `f` suffix on every component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatList<const N: usize>(pub [f64; N]);

impl<const N: usize> fmt::Display for FloatList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write_float(f, *value)?;
        }
        f.write_str("]")
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    // -0.0 == 0.0, so this also folds negative zero
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 {
        write!(f, "{value:.1}f")
    } else {
        write!(f, "{value}f")
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub left_rotation: FloatList<4>,
    pub right_rotation: FloatList<4>,
    pub translation: FloatList<3>,
    pub scale: FloatList<3>,
}

impl Transform {
    /// Places grid cell (x, y) of a `width` x `height` image so the image is
    /// centered horizontally on the anchor and stands upright above it.
    pub fn for_cell(x: u32, y: u32, width: u32, height: u32, scale: f64) -> Self {
        let unit = GLYPH_SIZE * scale;
        let (x, y) = (f64::from(x), f64::from(y));
        let (width, height) = (f64::from(width), f64::from(height));

        let translation_x =
            round6(unit * x - (unit * width) / 2.0 + unit / HORIZONTAL_NUDGE_DIVISOR);
        let translation_y =
            round6(unit * (height - y) - unit * VERTICAL_BASELINE + unit * VERTICAL_NUDGE);

        Self {
            left_rotation: IDENTITY_ROTATION,
            right_rotation: IDENTITY_ROTATION,
            translation: FloatList([translation_x, translation_y, 0.0]),
            scale: FloatList([scale, scale, scale]),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacementCommand<'a> {
    pub anchor: &'a str,
    pub color: Rgb,
    pub transform: Transform,
}

impl fmt::Display for PlacementCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "summon text_display {} {{billboard:\"fixed\",text:'{{\"text\":\"{}\",\"color\":\"{}\"}}',background:0,",
            self.anchor, GLYPH, self.color
        )?;
        write!(
            f,
            "transformation:{{left_rotation:{},right_rotation:{},translation:{},scale:{}}}}}",
            self.transform.left_rotation,
            self.transform.right_rotation,
            self.transform.translation,
            self.transform.scale
        )
    }
}

/// One command per opaque cell, in row-major order.
pub fn emit(grid: &ColorGrid, scale: f64, anchor: &str) -> Vec<String> {
    let commands: Vec<String> = grid
        .opaque_cells()
        .map(|(x, y, color)| {
            PlacementCommand {
                anchor,
                color,
                transform: Transform::for_cell(x, y, grid.width(), grid.height(), scale),
            }
            .to_string()
        })
        .collect();
    debug!("generated {} commands", commands.len());
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_list_uses_suffix_and_keeps_one_decimal() {
        assert_eq!(IDENTITY_ROTATION.to_string(), "[0.0f,0.0f,0.0f,1.0f]");
        assert_eq!(
            FloatList([0.5, -0.075, 12.0]).to_string(),
            "[0.5f,-0.075f,12.0f]"
        );
    }

    #[test]
    fn float_list_folds_negative_zero() {
        assert_eq!(FloatList([-0.0, 0.0]).to_string(), "[0.0f,0.0f]");
    }

    #[test]
    fn float_list_never_uses_exponent() {
        assert_eq!(FloatList([0.000001]).to_string(), "[0.000001f]");
    }

    #[test]
    fn translation_centers_and_flips() {
        let top_left = Transform::for_cell(0, 0, 2, 2, 1.0);
        assert_eq!(top_left.translation, FloatList([-0.075, 0.025625, 0.0]));

        let bottom_right = Transform::for_cell(1, 1, 2, 2, 1.0);
        assert_eq!(bottom_right.translation, FloatList([0.05, -0.099375, 0.0]));
        assert_eq!(bottom_right.scale, FloatList([1.0, 1.0, 1.0]));
    }

    #[test]
    fn translation_scales_with_unit() {
        let single = Transform::for_cell(0, 0, 1, 1, 1.0);
        let double = Transform::for_cell(0, 0, 1, 1, 2.0);
        assert_eq!(double.translation.0[0], round6(single.translation.0[0] * 2.0));
        assert_eq!(double.translation.0[1], round6(single.translation.0[1] * 2.0));
        assert_eq!(double.scale, FloatList([2.0, 2.0, 2.0]));
    }

    #[test]
    fn translation_at_fractional_scale() {
        let transform = Transform::for_cell(3, 4, 7, 11, 0.4);
        assert_eq!(transform.translation, FloatList([-0.005, 0.26025, 0.0]));
        assert_eq!(transform.scale, FloatList([0.4, 0.4, 0.4]));
    }

    #[test]
    fn translation_is_rounded_to_six_places() {
        // unit = 0.125 / 3, so the raw x offset never terminates
        let transform = Transform::for_cell(0, 0, 1, 1, 1.0 / 3.0);
        assert_eq!(transform.translation, FloatList([-0.004167, -0.033125, 0.0]));
    }

    #[test]
    fn command_layout_is_exact() {
        let command = PlacementCommand {
            anchor: "~ ~ ~",
            color: Rgb::new(255, 0, 0),
            transform: Transform::for_cell(0, 0, 2, 2, 1.0),
        };
        assert_eq!(
            command.to_string(),
            "summon text_display ~ ~ ~ {billboard:\"fixed\",text:'{\"text\":\"\u{2588}\",\"color\":\"#FF0000\"}',background:0,transformation:{left_rotation:[0.0f,0.0f,0.0f,1.0f],right_rotation:[0.0f,0.0f,0.0f,1.0f],translation:[-0.075f,0.025625f,0.0f],scale:[1.0f,1.0f,1.0f]}}"
        );
    }

    #[test]
    fn emit_skips_transparent_cells_in_row_major_order() {
        let grid = ColorGrid::from_cells(
            2,
            2,
            vec![
                Some(Rgb::new(255, 0, 0)),
                None,
                Some(Rgb::new(0, 255, 0)),
                Some(Rgb::new(0, 0, 255)),
            ],
        )
        .unwrap();
        let commands = emit(&grid, 1.0, "~ ~ ~");
        assert_eq!(commands.len(), grid.opaque_count());
        assert!(commands[0].contains("\"color\":\"#FF0000\""));
        assert!(commands[1].contains("\"color\":\"#00FF00\""));
        assert!(commands[2].contains("\"color\":\"#0000FF\""));
        assert!(commands[2].contains("translation:[0.05f,-0.099375f,0.0f]"));
    }

    #[test]
    fn emit_inserts_anchor_verbatim() {
        let grid = ColorGrid::from_cells(1, 1, vec![Some(Rgb::new(1, 2, 3))]).unwrap();
        let commands = emit(&grid, 0.5, "100 64 ^-2");
        assert!(commands[0].starts_with("summon text_display 100 64 ^-2 {"));
        assert!(commands[0].ends_with("scale:[0.5f,0.5f,0.5f]}}"));
    }

    #[test]
    fn emit_on_transparent_grid_is_empty() {
        let grid = ColorGrid::from_cells(3, 1, vec![None; 3]).unwrap();
        assert!(emit(&grid, 1.0, "~ ~ ~").is_empty());
    }
}
