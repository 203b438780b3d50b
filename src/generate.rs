use std::path::Path;

use display_placer::{emit, load_image, rasterize, PlacerError, RunConfig};
use tracing::{debug, info};

pub fn generate(config_path: &Path) -> Result<(), PlacerError> {
    let config = RunConfig::load(config_path)?;
    let image_object = load_image(&config.image_file)?;
    let grid = rasterize(&image_object);
    config.validate_extent(grid.width(), grid.height())?;
    let commands = emit(&grid, config.scale, &config.coordinates);

    let mut output = String::new();
    for command in &commands {
        output.push_str(command);
        output.push('\n');
    }

    debug!("writing output file {}", config.output_file.display());
    std::fs::write(&config.output_file, output).map_err(|source| {
        PlacerError::WriteOutputFailed {
            path: config.output_file.clone(),
            source,
        }
    })?;
    info!(
        "wrote {} commands for a {}x{} image to {}",
        commands.len(),
        grid.width(),
        grid.height(),
        config.output_file.display()
    );
    Ok(())
}
