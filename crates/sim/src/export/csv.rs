//! Comma-separated parameter, occurrence and taxon tables.
//!
//! Floats are written with `{}` formatting (shortest representation that
//! reads back to the same value), so identical runs give identical files.

use super::ExportError;
use crate::birth_death::{ObservationKind, Observations};
use crate::tree::PhyloTree;

pub const PARAMETERS_HEADER: &str = "name,value";
pub const OCCURRENCES_HEADER: &str = "category,taxon,time";
pub const TAXA_HEADER: &str = "taxon,sampling,status,time";

/// One row of a taxa table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonRecord {
    pub taxon: String,
    /// `psi` or `rho`
    pub sampling: String,
    /// `extant`, `extinct` or `ancestor`
    pub status: String,
    pub time: f64,
}

pub fn format_parameters(named: &[(&str, f64)]) -> String {
    let mut content = format!("{PARAMETERS_HEADER}\n");
    for (name, value) in named {
        content.push_str(&format!("{name},{value}\n"));
    }
    content
}

pub fn parse_parameters(text: &str) -> Result<Vec<(String, f64)>, ExportError> {
    rows(text, PARAMETERS_HEADER, 2)?
        .into_iter()
        .map(|(line, fields)| {
            let value = parse_float(fields[1], line)?;
            Ok((fields[0].to_string(), value))
        })
        .collect()
}

/// All six record categories in export order. Records without a tree node
/// leave the taxon column empty.
pub fn format_occurrences(observations: &Observations) -> String {
    let mut content = format!("{OCCURRENCES_HEADER}\n");
    for (kind, records) in observations.iter() {
        for record in records {
            content.push_str(&format!(
                "{},{},{}\n",
                kind.name(),
                record.taxon.as_deref().unwrap_or(""),
                record.time
            ));
        }
    }
    content
}

pub fn parse_occurrences(text: &str) -> Result<Observations, ExportError> {
    let mut observations = Observations::new();
    for (line, fields) in rows(text, OCCURRENCES_HEADER, 3)? {
        let kind = ObservationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == fields[0])
            .ok_or_else(|| {
                ExportError::Parse(format!("line {line}: unknown category '{}'", fields[0]))
            })?;
        let taxon = (!fields[1].is_empty()).then(|| fields[1].to_string());
        observations.push(kind, parse_float(fields[2], line)?, taxon);
    }
    Ok(observations)
}

/// Every sampled leaf of `tree` with its sampling scheme and status.
pub fn format_taxa(tree: &PhyloTree) -> String {
    let mut content = format!("{TAXA_HEADER}\n");
    for id in tree.leaves() {
        let node = tree.node(id);
        if let (Some(sampling), Some(status)) = (node.kind.sampling(), node.kind.status()) {
            content.push_str(&format!(
                "{},{sampling},{status},{}\n",
                node.label, node.time
            ));
        }
    }
    content
}

pub fn parse_taxa(text: &str) -> Result<Vec<TaxonRecord>, ExportError> {
    rows(text, TAXA_HEADER, 4)?
        .into_iter()
        .map(|(line, fields)| {
            Ok(TaxonRecord {
                taxon: fields[0].to_string(),
                sampling: fields[1].to_string(),
                status: fields[2].to_string(),
                time: parse_float(fields[3], line)?,
            })
        })
        .collect()
}

/// Check the header and split the remaining non-empty lines into exactly
/// `width` fields. Line numbers are 1-based.
fn rows<'a>(
    text: &'a str,
    header: &str,
    width: usize,
) -> Result<Vec<(usize, Vec<&'a str>)>, ExportError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim() == header => {}
        other => {
            return Err(ExportError::Parse(format!(
                "expected header '{header}', found '{}'",
                other.unwrap_or("")
            )))
        }
    }

    let rows: Vec<(usize, Vec<&str>)> = lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 2, line.split(',').map(str::trim).collect()))
        .collect();

    if let Some((line, fields)) = rows.iter().find(|(_, fields)| fields.len() != width) {
        return Err(ExportError::Parse(format!(
            "line {line}: expected {width} fields, found {}",
            fields.len()
        )));
    }
    Ok(rows)
}

fn parse_float(text: &str, line: usize) -> Result<f64, ExportError> {
    text.parse()
        .map_err(|_| ExportError::Parse(format!("line {line}: invalid number '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::phylo::tests::sample_tree;

    #[test]
    fn test_parameters_table() {
        let text = format_parameters(&[("lamb", 1.25), ("mu", 1.0), ("alpha", 0.05)]);
        assert_eq!(text, "name,value\nlamb,1.25\nmu,1\nalpha,0.05\n");

        let parsed = parse_parameters(&text).unwrap();
        assert_eq!(parsed[0], ("lamb".to_string(), 1.25));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_occurrences_keep_category_order_and_empty_taxa() {
        let mut obs = Observations::new();
        obs.push(ObservationKind::RhoSampled, 0.0, Some("t3".into()));
        obs.push(ObservationKind::OmegaKept, 1.5, None);
        obs.push(ObservationKind::PsiRemoved, 0.75, Some("t1".into()));

        let text = format_occurrences(&obs);
        assert_eq!(
            text,
            "category,taxon,time\npsi_removed,t1,0.75\nomega_kept,,1.5\nrho_sampled,t3,0\n"
        );
        assert_eq!(parse_occurrences(&text).unwrap(), obs);
    }

    #[test]
    fn test_taxa_lists_sampled_leaves_only() {
        let text = format_taxa(&sample_tree());
        assert_eq!(
            text,
            "taxon,sampling,status,time\nt3,rho,extant,0\nt5,psi,extinct,0.2\n"
        );

        let taxa = parse_taxa(&text).unwrap();
        assert_eq!(taxa.len(), 2);
        assert_eq!(taxa[1].status, "extinct");
        assert!((taxa[1].time - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_parameters("foo,bar\n"),
            Err(ExportError::Parse(_))
        ));
        assert!(parse_parameters("name,value\nlamb\n").is_err());
        assert!(parse_parameters("name,value\nlamb,abc\n").is_err());
        assert!(parse_occurrences("category,taxon,time\nbirths,t1,0.5\n").is_err());
    }
}
