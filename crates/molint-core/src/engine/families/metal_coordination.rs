//! Metal coordination: transition metals with lone-pair donors (dative
//! bonds) and ionic-type metals with anionic or polar partners.

use super::common::valid_pair;
use super::{FeatureProvider, InteractionFamily, LinkTester, UnitContext};
use crate::core::chemistry::names::{
    is_amino_acid, is_histidine_ring_nitrogen, is_nucleotide, is_phosphate_oxygen, is_polymer,
    is_purine, is_water,
};
use crate::core::models::element::Element;
use crate::core::models::structure::Structure;
use crate::engine::config::{MetalCoordinationParams, ParamSpec};
use crate::engine::features::builder::FeaturesBuilder;
use crate::engine::features::{FeatureGroup, FeatureInfo, FeatureType};
use crate::engine::links::InteractionType;

pub const METAL_COORDINATION_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect metal coordination", true),
    ParamSpec::distance("distance-max", "Maximum metal-ligand distance", 3.0, 1.0, 5.0),
];

const OXYGEN_BINDING_RESIDUES: [&str; 7] = ["ASP", "GLU", "SER", "THR", "TYR", "ASN", "GLN"];

pub struct MetalProvider;

impl FeatureProvider for MetalProvider {
    fn name(&self) -> &'static str {
        "metals"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::IonicTypeMetal, FeatureType::TransitionMetal]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            let element = ctx.unit.element(i);
            if element.is_ionic_type_metal() {
                ctx.add_one(builder, FeatureType::IonicTypeMetal, FeatureGroup::None, i);
            } else if element.is_transition_metal() {
                ctx.add_one(builder, FeatureType::TransitionMetal, FeatureGroup::None, i);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    None,
    Dative,
    Both,
}

fn classify(ctx: &UnitContext<'_>, i: usize) -> Binding {
    let (residue, name, element) = (ctx.residue_name(i), ctx.atom_name(i), ctx.unit.element(i));
    if is_amino_acid(residue) {
        return match element {
            Element::O if matches!(name, "O" | "OXT") => Binding::Both,
            Element::O if OXYGEN_BINDING_RESIDUES.contains(&residue) => Binding::Both,
            Element::S if matches!(residue, "CYS" | "MET") => Binding::Both,
            Element::N if is_histidine_ring_nitrogen(residue, name) => Binding::Dative,
            _ => Binding::None,
        };
    }
    if is_nucleotide(residue) {
        return if element == Element::O && is_phosphate_oxygen(name) {
            Binding::Both
        } else if element == Element::N && name == "N7" && is_purine(residue) {
            Binding::Dative
        } else {
            Binding::None
        };
    }
    if is_water(residue) {
        return if element == Element::O {
            Binding::Both
        } else {
            Binding::None
        };
    }
    if !is_polymer(residue) && matches!(element, Element::N | Element::O | Element::S) {
        return Binding::Both;
    }
    Binding::None
}

/// Lone-pair donors that metals coordinate to.
pub struct MetalBindingProvider;

impl FeatureProvider for MetalBindingProvider {
    fn name(&self) -> &'static str {
        "metal-binding"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::DativeBondPartner, FeatureType::IonicTypePartner]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            let binding = classify(ctx, i);
            if binding == Binding::None {
                continue;
            }
            ctx.add_one(builder, FeatureType::DativeBondPartner, FeatureGroup::None, i);
            if binding == Binding::Both {
                ctx.add_one(builder, FeatureType::IonicTypePartner, FeatureGroup::None, i);
            }
        }
    }
}

pub struct MetalCoordinationTester {
    distance_max: f64,
}

impl MetalCoordinationTester {
    pub fn new(params: &MetalCoordinationParams) -> Self {
        Self {
            distance_max: params.distance_max,
        }
    }
}

fn coordinates(metal: FeatureType, partner: FeatureType) -> bool {
    matches!(
        (metal, partner),
        (
            FeatureType::TransitionMetal,
            FeatureType::DativeBondPartner | FeatureType::TransitionMetal
        ) | (FeatureType::IonicTypeMetal, FeatureType::IonicTypePartner)
    )
}

impl LinkTester for MetalCoordinationTester {
    fn family(&self) -> InteractionFamily {
        InteractionFamily::MetalCoordination
    }

    fn max_distance(&self) -> f64 {
        self.distance_max
    }

    fn get_type(
        &self,
        structure: &Structure,
        a: &FeatureInfo<'_>,
        b: &FeatureInfo<'_>,
        _distance_sq: f64,
    ) -> Option<InteractionType> {
        let (ta, tb) = (a.feature_type(), b.feature_type());
        if !coordinates(ta, tb) && !coordinates(tb, ta) {
            return None;
        }
        valid_pair(structure, a, b).then_some(InteractionType::MetalCoordination)
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::fixtures::structure;
    use super::*;
    use crate::engine::features::Features;

    fn features_of(s: &Structure) -> Features {
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(s, unit);
        let mut builder = FeaturesBuilder::new(8, 8);
        MetalProvider.add(&ctx, &mut builder);
        MetalBindingProvider.add(&ctx, &mut builder);
        builder.get_features(unit.len())
    }

    #[test]
    fn binding_partners_follow_residue_rules() {
        let s = structure(
            &[
                (
                    "HIS",
                    &[
                        ("N", Element::N, [0.0, 0.0, 0.0]),
                        ("O", Element::O, [1.0, 0.0, 0.0]),
                        ("NE2", Element::N, [2.0, 0.0, 0.0]),
                    ],
                ),
                ("HOH", &[("O", Element::O, [5.0, 0.0, 0.0])]),
                ("ZN", &[("ZN", Element::Zn, [7.0, 0.0, 0.0])]),
                ("NA", &[("NA", Element::Na, [9.0, 0.0, 0.0])]),
            ],
            &[],
        );
        let features = features_of(&s);
        let summary: Vec<_> = (0..features.len())
            .map(|i| (features.feature_type(i), features.members(i)[0]))
            .collect();
        assert_eq!(
            summary,
            vec![
                (FeatureType::TransitionMetal, 4),
                (FeatureType::IonicTypeMetal, 5),
                (FeatureType::DativeBondPartner, 1),
                (FeatureType::IonicTypePartner, 1),
                (FeatureType::DativeBondPartner, 2),
                (FeatureType::DativeBondPartner, 3),
                (FeatureType::IonicTypePartner, 3),
            ]
        );
    }

    #[test]
    fn tester_pairs_metals_with_matching_partners() {
        let s = structure(
            &[
                ("HIS", &[("NE2", Element::N, [0.0, 0.0, 0.0])]),
                ("ZN", &[("ZN", Element::Zn, [2.1, 0.0, 0.0])]),
                ("NA", &[("NA", Element::Na, [0.0, 2.4, 0.0])]),
            ],
            &[],
        );
        let features = features_of(&s);
        let unit = s.units().next().unwrap();
        let find = |t: FeatureType| {
            let i = (0..features.len())
                .find(|&i| features.feature_type(i) == t)
                .unwrap();
            FeatureInfo::new(unit, &features, i)
        };
        let tester = MetalCoordinationTester::new(&MetalCoordinationParams::default());
        let zn = find(FeatureType::TransitionMetal);
        let na = find(FeatureType::IonicTypeMetal);
        let his = find(FeatureType::DativeBondPartner);

        assert_eq!(
            tester.get_type(&s, &his, &zn, 4.41),
            Some(InteractionType::MetalCoordination)
        );
        assert_eq!(tester.get_type(&s, &na, &his, 5.76), None);
    }
}
