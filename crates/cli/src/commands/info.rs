use anyhow::{Context, Result};
use phylodyn_sim::export::{alignment_file_name, read_dataset, TaxonSelection};
use std::path::Path;

use crate::printing::{print_observation_counts, print_parameters};

pub fn show_info(dataset: &Path, selection: TaxonSelection) -> Result<()> {
    println!("📊 Dataset: {}", dataset.display());

    if !dataset.is_dir() {
        anyhow::bail!("Dataset directory does not exist");
    }

    let contents = read_dataset(dataset, selection).context("Failed to read dataset")?;

    println!("\n📋 Parameters");
    print_parameters(&contents.parameters);

    println!("\n🌳 Trees");
    println!(
        "  • Reconstructed: {} leaves, {} nodes, origin {:.4}, total length {:.4}",
        contents.reconstructed.leaves().len(),
        contents.reconstructed.len(),
        contents.reconstructed.origin(),
        contents.reconstructed.total_length()
    );
    println!(
        "  • Full: {} leaves, {} nodes, origin {:.4}, total length {:.4}",
        contents.full.leaves().len(),
        contents.full.len(),
        contents.full.origin(),
        contents.full.total_length()
    );

    println!("\n🔎 Occurrences");
    print_observation_counts(&contents.occurrences.counts(), "  ");

    println!("\n🧬 Taxa");
    for status in ["extant", "extinct", "ancestor"] {
        let count = contents.taxa.iter().filter(|t| t.status == status).count();
        println!("  • {status}: {count}");
    }

    println!("\n🧬 Alignment ({})", alignment_file_name(selection));
    let nchar = contents.alignment.first().map_or(0, |(_, seq)| seq.len());
    println!("  • {} taxa × {} sites", contents.alignment.len(), nchar);

    Ok(())
}
