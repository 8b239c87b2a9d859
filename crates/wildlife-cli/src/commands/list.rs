//! List command - fetch, filter and print sightings

use crate::api::Client;
use anyhow::Result;
use colored::Colorize;
use wildlife_core::filter::unique_species_types;
use wildlife_core::{SightingFilter, SightingView};

pub async fn execute(filter: SightingFilter, types_only: bool) -> Result<()> {
    let client = Client::from_settings()?;
    let sightings = client.list_sightings().await?;
    let views = SightingView::from_sightings(&sightings);

    if types_only {
        let types = unique_species_types(&views);
        if types.is_empty() {
            println!("{}", "No species types recorded yet.".dimmed());
        }
        for species_type in types {
            println!("{}", species_type);
        }
        return Ok(());
    }

    let matching = filter.apply(&views);
    if matching.is_empty() {
        if views.is_empty() {
            println!("{}", "No sightings recorded yet.".dimmed());
        } else {
            println!("{}", "No sightings match the given filters.".yellow());
        }
        return Ok(());
    }

    for view in &matching {
        println!("{}", format_sighting(view));
    }
    println!();
    if filter.is_empty() {
        println!("{} sighting(s)", views.len());
    } else {
        println!("{} of {} sighting(s)", matching.len(), views.len());
    }

    Ok(())
}

pub fn format_sighting(view: &SightingView) -> String {
    let images = if view.image_count > 0 {
        format!(" [{} image(s)]", view.image_count)
    } else {
        String::new()
    };
    format!(
        "{} ({}) at {} on {} {}{}  {}",
        view.species.bold(),
        view.species_type,
        view.coordinates.cyan(),
        view.date,
        view.time,
        images,
        view.id.dimmed()
    )
}
