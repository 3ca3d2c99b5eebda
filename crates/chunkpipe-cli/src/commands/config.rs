use std::path::Path;

use chunkpipe_core::PipeConfig;

pub fn init(output: Option<&Path>) -> anyhow::Result<()> {
    let content = PipeConfig::scaffold().to_toml_string()?;

    match output {
        Some(path) => {
            std::fs::write(path, &content)?;
            println!("✓ Generated {}", path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}
