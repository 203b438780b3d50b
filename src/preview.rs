use std::path::Path;

use display_placer::{load_image, rasterize, ColorGrid, PlacerError, RunConfig};

pub fn preview(config_path: &Path) -> Result<(), PlacerError> {
    let config = RunConfig::load(config_path)?;
    let image_object = load_image(&config.image_file)?;
    let grid = rasterize(&image_object);
    for line in render_rows(&grid) {
        println!("{line}");
    }
    Ok(())
}

fn render_rows(grid: &ColorGrid) -> Vec<String> {
    grid.rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Some(color) => color.to_string(),
                    None => "None".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
