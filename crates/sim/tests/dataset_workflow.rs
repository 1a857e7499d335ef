//! Integration tests for whole batches written to disk.

use phylodyn_sim::export::{dataset_files, read_dataset, TaxonSelection, PARAMETERS_FILE};
use phylodyn_sim::simulation::{run_batch, Configuration, RUN_CONFIG_FILE};
use phylodyn_sim::tree::NodeKind;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn config(replicates: usize, seed: u64, length: usize) -> Configuration {
    let mut config = Configuration::default();
    config.execution.replicates = replicates;
    config.execution.seed = seed;
    config.sequences.length = length;
    config
}

fn read_all(dir: &Path) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            (
                path.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read_to_string(&path).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_single_replicate_layout() {
    let tmp = tempdir().unwrap();
    run_batch(&config(1, 1, 1000), tmp.path(), |_, _| {}).unwrap();

    assert!(tmp.path().join(RUN_CONFIG_FILE).is_file());
    let dataset = tmp.path().join("dataset0");
    assert!(!tmp.path().join("dataset1").exists());

    let mut expected = dataset_files(TaxonSelection::ExtantExtinct);
    expected.sort();
    let found: Vec<String> = read_all(&dataset)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(found, expected);

    let parameters = fs::read_to_string(dataset.join(PARAMETERS_FILE)).unwrap();
    let names: Vec<&str> = parameters
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(names, ["lamb", "mu", "rho", "psi", "r", "omega", "alpha"]);
}

#[test]
fn test_same_seed_gives_identical_files() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    run_batch(&config(3, 17, 200), a.path(), |_, _| {}).unwrap();
    run_batch(&config(3, 17, 200), b.path(), |_, _| {}).unwrap();

    for i in 0..3 {
        let name = format!("dataset{i}");
        assert_eq!(read_all(&a.path().join(&name)), read_all(&b.path().join(&name)));
    }
}

#[test]
fn test_rerun_after_deleting_reproduces_dataset() {
    let tmp = tempdir().unwrap();
    let dataset = tmp.path().join("dataset0");
    run_batch(&config(1, 1, 300), tmp.path(), |_, _| {}).unwrap();
    let before = read_all(&dataset);

    fs::remove_dir_all(&dataset).unwrap();
    run_batch(&config(1, 1, 300), tmp.path(), |_, _| {}).unwrap();
    assert_eq!(read_all(&dataset), before);
}

#[test]
fn test_dataset_invariants() {
    let tmp = tempdir().unwrap();
    let summaries = run_batch(&config(10, 3, 1000), tmp.path(), |_, _| {}).unwrap();

    for summary in &summaries {
        let dir = tmp.path().join(&summary.name);
        let contents = read_dataset(&dir, TaxonSelection::ExtantExtinct).unwrap();

        let lamb = contents.parameter("lamb").unwrap();
        let mu = contents.parameter("mu").unwrap();
        let rho = contents.parameter("rho").unwrap();
        let r = contents.parameter("r").unwrap();
        assert!(lamb > mu, "{}: lamb {lamb} <= mu {mu}", summary.name);
        assert!((0.8..=1.0).contains(&rho));
        assert!((0.0..=1.0).contains(&r));
        assert!((1.0..=5.0).contains(&summary.origin));

        let full: HashSet<&str> = contents.full.leaf_labels().into_iter().collect();
        let reconstructed: HashSet<&str> =
            contents.reconstructed.leaf_labels().into_iter().collect();
        assert!(reconstructed.is_subset(&full));

        let aligned: HashSet<&str> = contents
            .alignment
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(aligned, reconstructed);

        let taxa: HashSet<&str> = contents.taxa.iter().map(|t| t.taxon.as_str()).collect();
        assert_eq!(taxa, reconstructed);

        for (label, seq) in &contents.alignment {
            assert_eq!(seq.len(), 1000, "{label}");
            assert!(seq.to_string().chars().all(|c| "ACGT".contains(c)));
        }

        assert_eq!(contents.occurrences.counts(), summary.observation_counts);
        assert!(summary.observation_counts[4] >= 1);
    }
}

#[test]
fn test_net_rate_is_second_exponential_draw() {
    let tmp = tempdir().unwrap();
    run_batch(&config(1, 1, 10), tmp.path(), |_, _| {}).unwrap();
    let dir = tmp.path().join("dataset0");
    let contents = read_dataset(&dir, TaxonSelection::ExtantExtinct).unwrap();

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let _origin: f64 = rand::Rng::random(&mut rng);
    let _mu: f64 = Exp::new(1.0).unwrap().sample(&mut rng);
    let net: f64 = Exp::new(1.0 / 0.01).unwrap().sample(&mut rng);

    let lamb = contents.parameter("lamb").unwrap();
    let mu = contents.parameter("mu").unwrap();
    assert!((lamb - mu - net).abs() < 1e-12);
}

#[test]
fn test_extant_selection_exports_rho_samples_only() {
    let tmp = tempdir().unwrap();
    let mut config = config(2, 5, 50);
    config.sequences.selection = TaxonSelection::Extant;
    run_batch(&config, tmp.path(), |_, _| {}).unwrap();

    for i in 0..2 {
        let dir = tmp.path().join(format!("dataset{i}"));
        let contents = read_dataset(&dir, TaxonSelection::Extant).unwrap();
        let extant: HashSet<&str> = contents
            .taxa
            .iter()
            .filter(|t| t.status == "extant")
            .map(|t| t.taxon.as_str())
            .collect();
        let aligned: HashSet<&str> = contents
            .alignment
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(aligned, extant);
        assert!(!extant.is_empty());
        assert!(contents
            .reconstructed
            .nodes()
            .iter()
            .all(|node| node.kind == NodeKind::Tip || node.kind == NodeKind::Internal));
    }
}
