//! Attach command - add or replace a sighting's images

use super::images::load_images;
use crate::api::Client;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use wildlife_core::AttachMode;

pub async fn execute(sighting_id: &str, images: &[PathBuf], append: bool) -> Result<()> {
    if images.is_empty() {
        anyhow::bail!("At least one --image is required");
    }

    let uploads = load_images(images).await?;
    let mode = if append {
        AttachMode::Append
    } else {
        AttachMode::Replace
    };

    let client = Client::from_settings()?;
    let sighting = client.attach_images(sighting_id, uploads, mode).await?;

    println!(
        "{} Sighting {} now has {} image(s) ({})",
        "✓".green(),
        sighting.id.cyan(),
        sighting.images.len(),
        mode
    );
    for image in &sighting.images {
        println!("  {} {} ({} bytes)", image.name, image.mime_type.dimmed(), image.size);
    }

    Ok(())
}
