//! Dataset files on disk.
//!
//! Each replicate owns one directory holding:
//!
//! | file | content |
//! |---|---|
//! | `parameters.csv` | the seven model parameters |
//! | `tree_reconstructed.nw` | reconstructed tree, Newick |
//! | `tree_full.nw` | full tree, Newick |
//! | `occurrences.csv` | event records of all six categories |
//! | `taxa.csv` | sampled taxa of the reconstructed tree |
//! | `sequences_<selection>.nex` | Nexus alignment |

mod csv;
mod error;
mod nexus;

pub use csv::{
    format_occurrences, format_parameters, format_taxa, parse_occurrences, parse_parameters,
    parse_taxa, TaxonRecord,
};
pub use error::ExportError;
pub use nexus::{read_nexus_matrix, write_nexus, TaxonSelection};

use std::fs;
use std::path::{Path, PathBuf};

use crate::base::Sequence;
use crate::birth_death::Observations;
use crate::evolution::SequencedTree;
use crate::tree::{parse_newick, write_newick, PhyloTree};

pub const PARAMETERS_FILE: &str = "parameters.csv";
pub const RECONSTRUCTED_TREE_FILE: &str = "tree_reconstructed.nw";
pub const FULL_TREE_FILE: &str = "tree_full.nw";
pub const OCCURRENCES_FILE: &str = "occurrences.csv";
pub const TAXA_FILE: &str = "taxa.csv";

pub fn alignment_file_name(selection: TaxonSelection) -> String {
    format!("sequences_{}.nex", selection.label())
}

/// Every file a complete dataset directory contains.
pub fn dataset_files(selection: TaxonSelection) -> Vec<String> {
    vec![
        PARAMETERS_FILE.to_string(),
        RECONSTRUCTED_TREE_FILE.to_string(),
        FULL_TREE_FILE.to_string(),
        OCCURRENCES_FILE.to_string(),
        TAXA_FILE.to_string(),
        alignment_file_name(selection),
    ]
}

/// Writes the files of one dataset into its own directory.
#[derive(Debug)]
pub struct DatasetWriter {
    dir: PathBuf,
}

impl DatasetWriter {
    /// Create the dataset directory. Fails if it already exists, so an
    /// earlier dataset is never overwritten.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_parameters(&self, named: &[(&str, f64)]) -> Result<(), ExportError> {
        self.write(PARAMETERS_FILE, &format_parameters(named))
    }

    pub fn write_tree(&self, file_name: &str, tree: &PhyloTree) -> Result<(), ExportError> {
        let mut content = write_newick(tree);
        content.push('\n');
        self.write(file_name, &content)
    }

    pub fn write_occurrences(&self, observations: &Observations) -> Result<(), ExportError> {
        self.write(OCCURRENCES_FILE, &format_occurrences(observations))
    }

    pub fn write_taxa(&self, tree: &PhyloTree) -> Result<(), ExportError> {
        self.write(TAXA_FILE, &format_taxa(tree))
    }

    pub fn write_alignment(
        &self,
        seq_tree: &SequencedTree,
        selection: TaxonSelection,
    ) -> Result<(), ExportError> {
        self.write(
            &alignment_file_name(selection),
            &write_nexus(seq_tree, selection)?,
        )
    }

    fn write(&self, file_name: &str, content: &str) -> Result<(), ExportError> {
        fs::write(self.dir.join(file_name), content)?;
        Ok(())
    }
}

/// Parsed contents of one dataset directory.
#[derive(Debug, Clone)]
pub struct DatasetContents {
    pub parameters: Vec<(String, f64)>,
    pub reconstructed: PhyloTree,
    pub full: PhyloTree,
    pub occurrences: Observations,
    pub taxa: Vec<TaxonRecord>,
    pub alignment: Vec<(String, Sequence)>,
}

impl DatasetContents {
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, value)| value)
    }
}

/// Read back every file of a dataset directory.
pub fn read_dataset(
    dir: impl AsRef<Path>,
    selection: TaxonSelection,
) -> Result<DatasetContents, ExportError> {
    let dir = dir.as_ref();
    let read = |name: &str| -> Result<String, ExportError> {
        fs::read_to_string(dir.join(name)).map_err(|e| {
            ExportError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", dir.join(name).display()),
            ))
        })
    };
    let tree = |name: &str| -> Result<PhyloTree, ExportError> {
        parse_newick(read(name)?.trim()).map_err(|e| ExportError::Parse(format!("{name}: {e}")))
    };

    Ok(DatasetContents {
        parameters: parse_parameters(&read(PARAMETERS_FILE)?)?,
        reconstructed: tree(RECONSTRUCTED_TREE_FILE)?,
        full: tree(FULL_TREE_FILE)?,
        occurrences: parse_occurrences(&read(OCCURRENCES_FILE)?)?,
        taxa: parse_taxa(&read(TAXA_FILE)?)?,
        alignment: read_nexus_matrix(&read(&alignment_file_name(selection))?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth_death::ObservationKind;
    use crate::evolution::{ClockParameters, SequenceSimulator, StrictClockJc69};
    use crate::tree::phylo::tests::sample_tree;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use tempfile::tempdir;

    #[test]
    fn test_create_refuses_existing_directory() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("dataset0");
        DatasetWriter::create(&dir).unwrap();
        assert!(matches!(
            DatasetWriter::create(&dir),
            Err(ExportError::Io(_))
        ));
    }

    #[test]
    fn test_written_dataset_reads_back() {
        let tmp = tempdir().unwrap();
        let writer = DatasetWriter::create(tmp.path().join("dataset0")).unwrap();

        let full = sample_tree();
        let recon = full.reconstructed().unwrap();
        let mut obs = Observations::new();
        obs.push(ObservationKind::RhoSampled, 0.0, Some("t3".into()));
        obs.push(ObservationKind::PsiRemoved, 0.2, Some("t5".into()));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let seq_tree = StrictClockJc69
            .simulate_along_tree(&ClockParameters::new(0.05).unwrap(), &recon, 50, &mut rng)
            .unwrap();

        writer.write_parameters(&[("lamb", 1.5), ("mu", 1.0)]).unwrap();
        writer.write_tree(RECONSTRUCTED_TREE_FILE, &recon).unwrap();
        writer.write_tree(FULL_TREE_FILE, &full).unwrap();
        writer.write_occurrences(&obs).unwrap();
        writer.write_taxa(&recon).unwrap();
        writer
            .write_alignment(&seq_tree, TaxonSelection::ExtantExtinct)
            .unwrap();

        for file in dataset_files(TaxonSelection::ExtantExtinct) {
            assert!(writer.dir().join(&file).is_file(), "missing {file}");
        }

        let contents = read_dataset(writer.dir(), TaxonSelection::ExtantExtinct).unwrap();
        assert_eq!(contents.parameter("lamb"), Some(1.5));
        assert_eq!(contents.parameter("alpha"), None);
        assert_eq!(contents.reconstructed.leaf_labels(), vec!["t3", "t5"]);
        assert_eq!(contents.full.leaf_labels(), full.leaf_labels());
        assert_eq!(contents.occurrences, obs);
        assert_eq!(contents.taxa.len(), 2);
        assert_eq!(contents.alignment.len(), 2);
        assert_eq!(contents.alignment[0].1.len(), 50);
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let tmp = tempdir().unwrap();
        let err = read_dataset(tmp.path(), TaxonSelection::ExtantExtinct).unwrap_err();
        assert!(err.to_string().contains(PARAMETERS_FILE));
    }
}
