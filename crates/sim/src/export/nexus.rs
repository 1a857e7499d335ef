//! Nexus alignment writing and reading.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::base::Sequence;
use crate::evolution::SequencedTree;
use crate::tree::NodeKind;

/// Which sampled leaves go into an exported alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxonSelection {
    /// Leaves sampled at present.
    Extant,
    /// Leaves sampled through time, sampled ancestors included.
    Extinct,
    /// Every sampled leaf.
    #[default]
    ExtantExtinct,
}

impl TaxonSelection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Extant => "extant",
            Self::Extinct => "extinct",
            Self::ExtantExtinct => "extant-extinct",
        }
    }

    pub fn includes(self, kind: NodeKind) -> bool {
        match self {
            Self::Extant => kind == NodeKind::RhoSampled,
            Self::Extinct => matches!(kind, NodeKind::PsiSampled | NodeKind::SampledAncestor),
            Self::ExtantExtinct => kind.is_sampled(),
        }
    }
}

impl fmt::Display for TaxonSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaxonSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extant" => Ok(Self::Extant),
            "extinct" => Ok(Self::Extinct),
            "extant-extinct" => Ok(Self::ExtantExtinct),
            _ => Err(format!(
                "unknown taxon selection '{s}' (expected extant, extinct or extant-extinct)"
            )),
        }
    }
}

/// Write the selected leaves of `seq_tree` as a Nexus file with TAXA,
/// CHARACTERS and SETS blocks. Taxon sets group the exported taxa by status.
///
/// A selection matching no leaf gives a file with `NTAX=0` and an empty
/// matrix.
pub fn write_nexus(
    seq_tree: &SequencedTree,
    selection: TaxonSelection,
) -> Result<String, ExportError> {
    let taxa: Vec<_> = seq_tree
        .leaf_sequences()
        .into_iter()
        .filter(|(_, _, kind)| selection.includes(*kind))
        .collect();

    let nchar = seq_tree.sequence_length();
    if let Some((label, seq, _)) = taxa.iter().find(|(_, seq, _)| seq.len() != nchar) {
        return Err(ExportError::Format(format!(
            "sequence of {label} has length {}, expected {nchar}",
            seq.len()
        )));
    }

    let mut content = String::from("#NEXUS\n\n");

    content.push_str("BEGIN TAXA;\n");
    content.push_str(&format!("    DIMENSIONS NTAX={};\n", taxa.len()));
    content.push_str("    TAXLABELS\n");
    for (label, _, _) in &taxa {
        content.push_str(&format!("        {label}\n"));
    }
    content.push_str("    ;\nEND;\n\n");

    content.push_str("BEGIN CHARACTERS;\n");
    content.push_str(&format!("    DIMENSIONS NCHAR={nchar};\n"));
    content.push_str("    FORMAT DATATYPE=DNA MISSING=? GAP=-;\n");
    content.push_str("    MATRIX\n");
    for (label, seq, _) in &taxa {
        content.push_str(&format!("        {label} {seq}\n"));
    }
    content.push_str("    ;\nEND;\n\n");

    content.push_str("BEGIN SETS;\n");
    for status in ["extant", "extinct", "ancestor"] {
        let members: Vec<&str> = taxa
            .iter()
            .filter(|(_, _, kind)| kind.status() == Some(status))
            .map(|(label, _, _)| *label)
            .collect();
        if !members.is_empty() {
            content.push_str(&format!("    TAXSET {status} = {};\n", members.join(" ")));
        }
    }
    content.push_str("END;\n");

    Ok(content)
}

/// Read the taxon/sequence rows of the `MATRIX` command.
pub fn read_nexus_matrix(text: &str) -> Result<Vec<(String, Sequence)>, ExportError> {
    if !text.trim_start().to_ascii_uppercase().starts_with("#NEXUS") {
        return Err(ExportError::Parse("missing #NEXUS header".into()));
    }

    let mut lines = text
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.eq_ignore_ascii_case("MATRIX"));
    if lines.next().is_none() {
        return Err(ExportError::Parse("no MATRIX command".into()));
    }

    let mut rows = Vec::new();
    for line in lines {
        if line.starts_with(';') {
            return Ok(rows);
        }
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(label), Some(chars), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(ExportError::Parse(format!("malformed MATRIX row '{line}'")));
        };
        let seq = Sequence::from_str(chars)
            .map_err(|e| ExportError::Parse(format!("taxon {label}: {e}")))?;
        rows.push((label.to_string(), seq));
    }

    Err(ExportError::Parse("unterminated MATRIX command".into()))
}
