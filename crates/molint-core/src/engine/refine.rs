//! Post-detection refinement.
//!
//! Refinement never removes an edge. Superseded edges are flagged
//! [`InteractionFlag::Filtered`] and disappear from the default accessors
//! while remaining reachable through the `all_*` variants.

use super::error::EngineError;
use super::features::{FeatureInfo, FeatureType, Features};
use super::links::inter::InterUnitLinks;
use super::links::intra::IntraUnitLinks;
use super::links::{InteractionFlag, InteractionType};
use crate::core::models::ids::{ResidueIndex, UnitAtomIndex, UnitId};
use crate::core::models::structure::Structure;
use slotmap::SecondaryMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

type AtomKey = (UnitId, UnitAtomIndex);
type ResidueKey = (UnitId, ResidueIndex);

#[derive(Debug, Clone, Copy)]
enum Location {
    Intra { unit: UnitId, edge: usize },
    Inter { pair: usize, edge: usize },
}

struct Candidate<'a> {
    location: Location,
    interaction: InteractionType,
    a: FeatureInfo<'a>,
    b: FeatureInfo<'a>,
}

impl Candidate<'_> {
    fn distance_sq(&self) -> f64 {
        (self.a.center() - self.b.center()).norm_squared()
    }

    fn residue_pair(&self) -> (ResidueKey, ResidueKey) {
        ordered(residue_key(&self.a), residue_key(&self.b))
    }

    /// The side carrying a feature of type `t`, and the other side.
    fn split(&self, t: FeatureType) -> Option<(&FeatureInfo<'_>, &FeatureInfo<'_>)> {
        if self.a.feature_type() == t {
            Some((&self.a, &self.b))
        } else if self.b.feature_type() == t {
            Some((&self.b, &self.a))
        } else {
            None
        }
    }
}

fn ordered<T: Ord>(x: T, y: T) -> (T, T) {
    if x <= y { (x, y) } else { (y, x) }
}

fn atom_key(info: &FeatureInfo<'_>) -> AtomKey {
    (info.unit.id(), info.atom())
}

fn residue_key(info: &FeatureInfo<'_>) -> ResidueKey {
    (info.unit.id(), info.unit.residue_index(info.atom()))
}

fn collect<'a>(
    structure: &'a Structure,
    features: &'a SecondaryMap<UnitId, Features>,
    intra: &SecondaryMap<UnitId, IntraUnitLinks>,
    inter: &InterUnitLinks,
) -> Result<Vec<Candidate<'a>>, EngineError> {
    let view = |unit_id: UnitId| -> Result<_, EngineError> {
        let unit = structure
            .unit(unit_id)
            .ok_or(EngineError::UnitNotFound(unit_id))?;
        let features = features
            .get(unit_id)
            .ok_or_else(|| EngineError::Internal(format!("no features for unit {unit_id:?}")))?;
        Ok((unit, features))
    };

    let mut candidates = Vec::new();
    for &unit_id in structure.unit_ids() {
        let Some(links) = intra.get(unit_id) else {
            continue;
        };
        let (unit, unit_features) = view(unit_id)?;
        for (edge, e) in links.all_edges().iter().enumerate() {
            if e.is_filtered() {
                continue;
            }
            candidates.push(Candidate {
                location: Location::Intra { unit: unit_id, edge },
                interaction: e.interaction,
                a: FeatureInfo::new(unit, unit_features, e.a as usize),
                b: FeatureInfo::new(unit, unit_features, e.b as usize),
            });
        }
    }
    for (pair, links) in inter.pairs().iter().enumerate() {
        let (unit_a, features_a) = view(links.unit_a)?;
        let (unit_b, features_b) = view(links.unit_b)?;
        for (edge, e) in links.all_edges().iter().enumerate() {
            if e.is_filtered() {
                continue;
            }
            candidates.push(Candidate {
                location: Location::Inter { pair, edge },
                interaction: e.interaction,
                a: FeatureInfo::new(unit_a, features_a, e.a as usize),
                b: FeatureInfo::new(unit_b, features_b, e.b as usize),
            });
        }
    }
    Ok(candidates)
}

/// Hydrogen bonds between atoms that already form an ionic contact.
fn filter_salt_bridges(candidates: &[Candidate<'_>], filtered: &mut HashSet<usize>) {
    let mut ionic_atoms: HashSet<(AtomKey, AtomKey)> = HashSet::new();
    for c in candidates
        .iter()
        .filter(|c| c.interaction == InteractionType::Ionic)
    {
        for &ma in c.a.members() {
            for &mb in c.b.members() {
                ionic_atoms.insert(ordered(
                    (c.a.unit.id(), ma as usize),
                    (c.b.unit.id(), mb as usize),
                ));
            }
        }
    }
    if ionic_atoms.is_empty() {
        return;
    }
    for (i, c) in candidates.iter().enumerate() {
        if c.interaction == InteractionType::HydrogenBond
            && ionic_atoms.contains(&ordered(atom_key(&c.a), atom_key(&c.b)))
        {
            filtered.insert(i);
        }
    }
}

/// Weak hydrogen bonds whose donor residue already hydrogen-bonds the acceptor.
fn filter_weak_hydrogen_bonds(candidates: &[Candidate<'_>], filtered: &mut HashSet<usize>) {
    let strong: HashSet<(ResidueKey, AtomKey)> = candidates
        .iter()
        .enumerate()
        .filter(|(i, c)| c.interaction == InteractionType::HydrogenBond && !filtered.contains(i))
        .filter_map(|(_, c)| c.split(FeatureType::HydrogenDonor))
        .map(|(don, acc)| (residue_key(don), atom_key(acc)))
        .collect();
    for (i, c) in candidates.iter().enumerate() {
        if c.interaction != InteractionType::WeakHydrogenBond {
            continue;
        }
        if let Some((don, acc)) = c.split(FeatureType::WeakHydrogenDonor)
            && strong.contains(&(residue_key(don), atom_key(acc)))
        {
            filtered.insert(i);
        }
    }
}

/// Keeps only the shortest edge of each type between any two residues.
fn keep_shortest_per_residue_pair(
    candidates: &[Candidate<'_>],
    types: &[InteractionType],
    filtered: &mut HashSet<usize>,
) {
    let mut best: HashMap<(InteractionType, ResidueKey, ResidueKey), (usize, f64)> = HashMap::new();
    for (i, c) in candidates.iter().enumerate() {
        if !types.contains(&c.interaction) || filtered.contains(&i) {
            continue;
        }
        let (ra, rb) = c.residue_pair();
        let d = c.distance_sq();
        match best.get_mut(&(c.interaction, ra, rb)) {
            Some(entry) if d < entry.1 => {
                filtered.insert(entry.0);
                *entry = (i, d);
            }
            Some(_) => {
                filtered.insert(i);
            }
            None => {
                best.insert((c.interaction, ra, rb), (i, d));
            }
        }
    }
}

/// Flags superseded edges and returns how many were flagged.
pub fn refine(
    structure: &Structure,
    features: &SecondaryMap<UnitId, Features>,
    intra: &mut SecondaryMap<UnitId, IntraUnitLinks>,
    inter: &mut InterUnitLinks,
) -> Result<usize, EngineError> {
    let candidates = collect(structure, features, intra, inter)?;
    let mut filtered = HashSet::new();

    filter_salt_bridges(&candidates, &mut filtered);
    filter_weak_hydrogen_bonds(&candidates, &mut filtered);
    keep_shortest_per_residue_pair(
        &candidates,
        &[
            InteractionType::Hydrophobic,
            InteractionType::PiStacking,
            InteractionType::CationPi,
        ],
        &mut filtered,
    );

    let locations: Vec<Location> = filtered.iter().map(|&i| candidates[i].location).collect();
    for location in &locations {
        match *location {
            Location::Intra { unit, edge } => {
                let links = intra
                    .get_mut(unit)
                    .ok_or(EngineError::UnitNotFound(unit))?;
                links.set_flag(edge, InteractionFlag::Filtered);
            }
            Location::Inter { pair, edge } => {
                let links = inter.pairs_mut().get_mut(pair).ok_or_else(|| {
                    EngineError::Internal(format!("unit pair {pair} out of range"))
                })?;
                links.set_flag(edge, InteractionFlag::Filtered);
            }
        }
    }

    debug!(filtered = locations.len(), "Refinement complete");
    Ok(locations.len())
}
