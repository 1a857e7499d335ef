use serde::{Deserialize, Serialize};

/// Category of a recorded sampling event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationKind {
    PsiRemoved,
    PsiAncestor,
    OmegaRemoved,
    OmegaKept,
    RhoSampled,
    ExtantUnsampled,
}

impl ObservationKind {
    /// Export order.
    pub const ALL: [ObservationKind; 6] = [
        Self::PsiRemoved,
        Self::PsiAncestor,
        Self::OmegaRemoved,
        Self::OmegaKept,
        Self::RhoSampled,
        Self::ExtantUnsampled,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PsiRemoved => "psi_removed",
            Self::PsiAncestor => "psi_ancestor",
            Self::OmegaRemoved => "omega_removed",
            Self::OmegaKept => "omega_kept",
            Self::RhoSampled => "rho_sampled",
            Self::ExtantUnsampled => "extant_unsampled",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Time before present.
    pub time: f64,
    /// Label of the tree node created by the event, if any. Occurrences
    /// without removal leave no node.
    pub taxon: Option<String>,
}

/// The six event collections produced alongside a simulated tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    records: [Vec<ObservationRecord>; 6],
}

impl Observations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ObservationKind, time: f64, taxon: Option<String>) {
        self.records[kind.index()].push(ObservationRecord { time, taxon });
    }

    pub fn get(&self, kind: ObservationKind) -> &[ObservationRecord] {
        &self.records[kind.index()]
    }

    #[inline]
    pub fn count(&self, kind: ObservationKind) -> usize {
        self.records[kind.index()].len()
    }

    /// Record counts in export order.
    pub fn counts(&self) -> [usize; 6] {
        ObservationKind::ALL.map(|kind| self.count(kind))
    }

    /// Collections paired with their kind, in export order.
    pub fn iter(&self) -> impl Iterator<Item = (ObservationKind, &[ObservationRecord])> {
        ObservationKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }
}
