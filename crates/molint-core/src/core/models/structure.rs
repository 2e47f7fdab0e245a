use super::ids::{AtomIndex, UnitAtomIndex, UnitId};
use super::model::{Model, ModelError};
use super::operator::SymmetryOperator;
use super::topology::BondOrder;
use super::unit::Unit;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A model viewed through one or more symmetry-placed units.
///
/// Units are kept in insertion order; every traversal of the structure
/// (feature building, unit pairs, result enumeration) follows that order.
#[derive(Debug, Clone)]
pub struct Structure {
    model: Arc<Model>,
    units: SlotMap<UnitId, Unit>,
    order: Vec<UnitId>,
    images: HashMap<String, Vec<UnitId>>,
}

impl Structure {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            units: SlotMap::with_key(),
            order: Vec::new(),
            images: HashMap::new(),
        }
    }

    /// Creates a structure with one identity-operator unit per chain, in
    /// order of first appearance.
    pub fn from_model(model: Model) -> Self {
        let model = Arc::new(model);
        let mut chains: Vec<(char, Vec<AtomIndex>)> = Vec::new();
        for (index, atom) in model.atoms().iter().enumerate() {
            let chain_id = model.residues()[atom.residue_index].chain_id;
            match chains.iter_mut().find(|(id, _)| *id == chain_id) {
                Some((_, elements)) => elements.push(index),
                None => chains.push((chain_id, vec![index])),
            }
        }

        let mut structure = Self::new(model);
        for (_, elements) in chains {
            structure.insert_unit(elements, SymmetryOperator::identity());
        }
        structure
    }

    /// Adds a unit over `elements` (strictly increasing model atom indices).
    pub fn add_unit(
        &mut self,
        elements: Vec<AtomIndex>,
        operator: SymmetryOperator,
    ) -> Result<UnitId, ModelError> {
        if elements.is_empty() {
            return Err(ModelError::EmptyUnit);
        }
        for pair in elements.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ModelError::UnsortedElements {
                    previous: pair[0],
                    found: pair[1],
                });
            }
        }
        if let Some(&last) = elements.last() {
            if last >= self.model.atom_count() {
                return Err(ModelError::AtomOutOfRange(last));
            }
        }
        Ok(self.insert_unit(elements, operator))
    }

    fn insert_unit(&mut self, elements: Vec<AtomIndex>, operator: SymmetryOperator) -> UnitId {
        let image = operator.name.clone();
        let unit = Unit::new(Arc::clone(&self.model), elements, operator);
        let id = self.units.insert(unit);
        self.units[id].id = id;
        self.order.push(id);
        self.images.entry(image).or_default().push(id);
        id
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn unit_ids(&self) -> &[UnitId] {
        &self.order
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.order.iter().map(move |&id| &self.units[id])
    }

    pub fn unit_count(&self) -> usize {
        self.order.len()
    }

    pub fn atom_count(&self) -> usize {
        self.units.values().map(Unit::len).sum()
    }

    /// Calls `f` for every atom covalently bonded to `local` in `unit`.
    ///
    /// Partners outside `unit` are resolved in other units of the same
    /// symmetry image (same operator name). Partners not present in any such
    /// unit are skipped.
    pub fn each_bonded_atom<F>(&self, unit: &Unit, local: UnitAtomIndex, mut f: F)
    where
        F: FnMut(&Unit, UnitAtomIndex, BondOrder),
    {
        for &(neighbor, order) in self.model.neighbors(unit.atom_index(local)) {
            if let Some(j) = unit.local_index(neighbor) {
                f(unit, j, order);
                continue;
            }
            let Some(siblings) = self.images.get(&unit.operator().name) else {
                continue;
            };
            for &other_id in siblings {
                if other_id == unit.id() {
                    continue;
                }
                let other = &self.units[other_id];
                if let Some(j) = other.local_index(neighbor) {
                    f(other, j, order);
                    break;
                }
            }
        }
    }

    pub fn bonded_count(&self, unit: &Unit, local: UnitAtomIndex) -> usize {
        let mut count = 0;
        self.each_bonded_atom(unit, local, |_, _, _| count += 1);
        count
    }

    /// Whether two atoms, possibly in different units, share a covalent bond.
    pub fn are_bonded(
        &self,
        unit_a: &Unit,
        a: UnitAtomIndex,
        unit_b: &Unit,
        b: UnitAtomIndex,
    ) -> bool {
        if unit_a.operator().name != unit_b.operator().name {
            return false;
        }
        self.model
            .are_bonded(unit_a.atom_index(a), unit_b.atom_index(b))
    }

    /// A content hash over atoms, bonds and unit placement.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.model.atom_count().hash(&mut hasher);
        for atom in self.model.atoms() {
            atom.name.hash(&mut hasher);
            atom.element.hash(&mut hasher);
            atom.residue_index.hash(&mut hasher);
            atom.alt_loc.hash(&mut hasher);
            atom.formal_charge.hash(&mut hasher);
            atom.implicit_hydrogens.hash(&mut hasher);
            for c in atom.position.coords.iter() {
                c.to_bits().hash(&mut hasher);
            }
        }
        for residue in self.model.residues() {
            residue.name.hash(&mut hasher);
            residue.seq_id.hash(&mut hasher);
            residue.chain_id.hash(&mut hasher);
        }
        for bond in self.model.bonds() {
            bond.hash(&mut hasher);
        }
        for unit in self.units() {
            unit.elements().hash(&mut hasher);
            unit.operator().name.hash(&mut hasher);
            for c in unit.operator().matrix().iter() {
                c.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}
