use anyhow::{Context, Result};
use phylodyn_sim::birth_death::ObservationKind;
use phylodyn_sim::export::{dataset_files, read_dataset, DatasetContents, TaxonSelection};
use phylodyn_sim::simulation::{Configuration, ParameterSet, RUN_CONFIG_FILE};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub fn validate_output(
    output: &Path,
    prefix: Option<&str>,
    selection: Option<TaxonSelection>,
) -> Result<()> {
    println!("🔍 Validating output: {}", output.display());

    if !output.is_dir() {
        anyhow::bail!("Output directory does not exist");
    }

    let config_path = output.join(RUN_CONFIG_FILE);
    let mut config = if config_path.is_file() {
        let text = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Configuration = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        println!("✓ Run configuration: {RUN_CONFIG_FILE}");
        config
    } else {
        println!("⚠️  No {RUN_CONFIG_FILE} found, using default settings");
        Configuration::default()
    };
    if let Some(prefix) = prefix {
        config.execution.prefix = prefix.to_string();
    }
    if let Some(selection) = selection {
        config.sequences.selection = selection;
    }

    let datasets = find_datasets(output, &config.execution.prefix)?;
    if datasets.is_empty() {
        anyhow::bail!(
            "No dataset directories named '{}<N>' found",
            config.execution.prefix
        );
    }

    let mut total_issues = 0;
    for (index, dir) in &datasets {
        let issues = check_dataset(dir, &config);
        if issues.is_empty() {
            println!("✓ {}{index}: OK", config.execution.prefix);
        } else {
            println!("✗ {}{index}: {} issue(s)", config.execution.prefix, issues.len());
            for issue in &issues {
                println!("    - {issue}");
            }
            total_issues += issues.len();
        }
    }

    let expected = config.execution.replicates;
    if config_path.is_file() && datasets.len() != expected {
        println!(
            "⚠️  Found {} datasets, run configuration lists {expected}",
            datasets.len()
        );
    }

    println!("\n{}", "=".repeat(50));
    if total_issues == 0 {
        println!("✓ All {} datasets passed validation", datasets.len());
        Ok(())
    } else {
        anyhow::bail!("Validation found {total_issues} issue(s)")
    }
}

/// Dataset directories `{prefix}{N}`, sorted by N.
fn find_datasets(output: &Path, prefix: &str) -> Result<Vec<(usize, PathBuf)>> {
    let mut datasets = Vec::new();
    for entry in fs::read_dir(output)
        .with_context(|| format!("Failed to list {}", output.display()))?
    {
        let path = entry.context("Failed to read directory entry")?.path();
        if !path.is_dir() {
            continue;
        }
        let index = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix(prefix))
            .and_then(|suffix| suffix.parse::<usize>().ok());
        if let Some(index) = index {
            datasets.push((index, path));
        }
    }
    datasets.sort();
    Ok(datasets)
}

fn check_dataset(dir: &Path, config: &Configuration) -> Vec<String> {
    let selection = config.sequences.selection;

    let missing: Vec<String> = dataset_files(selection)
        .into_iter()
        .filter(|file| !dir.join(file).is_file())
        .collect();
    if !missing.is_empty() {
        return vec![format!("missing files: {}", missing.join(", "))];
    }

    match read_dataset(dir, selection) {
        Ok(contents) => {
            let mut issues = check_parameters(&contents, config);
            issues.extend(check_trees_and_alignment(&contents, config));
            issues
        }
        Err(e) => vec![format!("unreadable: {e}")],
    }
}

fn check_parameters(contents: &DatasetContents, config: &Configuration) -> Vec<String> {
    let mut issues = Vec::new();

    let names: Vec<&str> = contents
        .parameters
        .iter()
        .map(|(n, _)| n.as_str())
        .collect();
    if names != ParameterSet::NAMES {
        issues.push(format!(
            "parameter names {names:?}, expected {:?}",
            ParameterSet::NAMES
        ));
        return issues;
    }

    let value = |name: &str| contents.parameter(name).unwrap_or(f64::NAN);
    let (lamb, mu) = (value("lamb"), value("mu"));
    if lamb.is_nan() || mu.is_nan() || lamb <= mu {
        issues.push(format!("lamb {lamb} is not greater than mu {mu}"));
    }

    let priors = &config.priors;
    for (name, min, max) in [
        ("rho", priors.rho_min, priors.rho_max),
        ("r", priors.removal_min, priors.removal_max),
    ] {
        let v = value(name);
        if !(min..=max).contains(&v) {
            issues.push(format!("{name} {v} outside [{min}, {max}]"));
        }
    }
    for name in ["mu", "psi", "omega", "alpha"] {
        let v = value(name);
        if !(v.is_finite() && v >= 0.0) {
            issues.push(format!("{name} {v} is not a non-negative rate"));
        }
    }

    let origin = contents.full.origin();
    // Origin is recovered from branch lengths, so allow rounding.
    let eps = 1e-9;
    if origin < priors.origin_min - eps || origin > priors.origin_max + eps {
        issues.push(format!(
            "origin {origin} outside [{}, {}]",
            priors.origin_min, priors.origin_max
        ));
    }

    issues
}

fn check_trees_and_alignment(contents: &DatasetContents, config: &Configuration) -> Vec<String> {
    let mut issues = Vec::new();

    let full: HashSet<&str> = contents.full.leaf_labels().into_iter().collect();
    let reconstructed: HashSet<&str> = contents.reconstructed.leaf_labels().into_iter().collect();
    if !reconstructed.is_subset(&full) {
        issues.push("reconstructed leaves are not a subset of the full tree leaves".to_string());
    }

    let taxa: HashSet<&str> = contents.taxa.iter().map(|t| t.taxon.as_str()).collect();
    if taxa != reconstructed {
        issues.push("taxa table does not match the reconstructed leaves".to_string());
    }

    let expected: HashSet<&str> = match config.sequences.selection {
        TaxonSelection::ExtantExtinct => reconstructed.clone(),
        TaxonSelection::Extant => contents
            .taxa
            .iter()
            .filter(|t| t.status == "extant")
            .map(|t| t.taxon.as_str())
            .collect(),
        TaxonSelection::Extinct => contents
            .taxa
            .iter()
            .filter(|t| t.status != "extant")
            .map(|t| t.taxon.as_str())
            .collect(),
    };
    let aligned: HashSet<&str> = contents
        .alignment
        .iter()
        .map(|(l, _)| l.as_str())
        .collect();
    if aligned != expected {
        issues.push(format!(
            "alignment has {} taxa, expected the {} '{}' leaves",
            aligned.len(),
            expected.len(),
            config.sequences.selection
        ));
    }

    // Non-nucleotide characters already fail while reading the matrix.
    let length = config.sequences.length;
    for (label, seq) in &contents.alignment {
        if seq.len() != length {
            issues.push(format!("sequence {label} has {} sites, expected {length}", seq.len()));
        }
    }

    if contents.occurrences.count(ObservationKind::RhoSampled) == 0 {
        issues.push("no lineage sampled at present".to_string());
    }

    issues
}
