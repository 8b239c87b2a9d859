//! Record command - submit a new sighting

use super::images::load_images;
use crate::api::Client;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use wildlife_core::{LatLng, SightingDraft};

pub struct RecordOptions {
    pub species: Option<String>,
    pub species_type: Option<String>,
    pub coordinates: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub images: Vec<PathBuf>,
}

pub async fn execute(options: RecordOptions) -> Result<()> {
    let species_name = required_or_prompt(options.species, "Species name")?;
    let species_type = required_or_prompt(options.species_type, "Species type")?;
    let coordinates = required_or_prompt(options.coordinates, "Coordinates (lat, lng)")?;

    if LatLng::parse(&coordinates).is_none() {
        println!(
            "{} Coordinates {} are not a valid \"lat, lng\" pair; the sighting will appear under Unknown Location.",
            "!".yellow(),
            coordinates.cyan()
        );
    }

    let uploads = load_images(&options.images).await?;

    let mut draft = SightingDraft::new(species_name, species_type, coordinates);
    draft.date = options.date;
    draft.time = options.time;

    let client = Client::from_settings()?;
    let recorded = client.create_sighting(draft, uploads).await?;

    println!("{} {}", "✓".green(), recorded.message);
    println!("  ID: {}", recorded.sighting.id.cyan());
    println!(
        "  {} ({}) at {} on {} {}",
        recorded.sighting.species_name.bold(),
        recorded.sighting.species_type,
        recorded.sighting.coordinates,
        recorded.sighting.date,
        recorded.sighting.time
    );
    for image_id in &recorded.image_ids {
        println!("  Image: {}", image_id.dimmed());
    }

    Ok(())
}

fn required_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) => Ok(value),
        None => {
            let value: String = dialoguer::Input::new()
                .with_prompt(prompt)
                .validate_with(|input: &String| {
                    if input.trim().is_empty() {
                        Err("This field is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            Ok(value)
        }
    }
}
