//! Markers command - print sightings grouped by location

use crate::api::Client;
use anyhow::Result;
use colored::Colorize;
use wildlife_core::{group_markers, SightingView};

pub async fn execute() -> Result<()> {
    let client = Client::from_settings()?;
    let sightings = client.list_sightings().await?;
    let views = SightingView::from_sightings(&sightings);

    let markers = group_markers(&views);
    if markers.is_empty() {
        println!("{}", "No sightings to place on the map.".dimmed());
        return Ok(());
    }

    for marker in &markers {
        println!(
            "{} {}",
            marker.position.to_string().cyan(),
            marker.title.bold()
        );
        if marker.sighting_count > 1 {
            for view in &marker.sightings {
                println!(
                    "    - {} ({}) {} {}",
                    view.species, view.species_type, view.date, view.time
                );
            }
        }
    }
    println!();
    println!(
        "{} marker(s) for {} sighting(s)",
        markers.len(),
        views.len()
    );

    Ok(())
}
