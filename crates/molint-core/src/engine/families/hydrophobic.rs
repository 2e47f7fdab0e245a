use super::common::valid_pair;
use super::{FeatureProvider, InteractionFamily, LinkTester, UnitContext};
use crate::core::models::element::Element;
use crate::core::models::structure::Structure;
use crate::engine::config::{HydrophobicParams, ParamSpec};
use crate::engine::features::builder::FeaturesBuilder;
use crate::engine::features::{FeatureGroup, FeatureInfo, FeatureType};
use crate::engine::links::InteractionType;

pub const HYDROPHOBIC_PARAMS: &[ParamSpec] = &[
    ParamSpec::flag("enabled", "Detect hydrophobic contacts", true),
    ParamSpec::distance("distance-max", "Maximum atom-atom distance", 4.0, 1.0, 5.0),
];

/// Carbons bonded only to carbon or hydrogen, and fluorine.
pub struct HydrophobicAtomProvider;

impl FeatureProvider for HydrophobicAtomProvider {
    fn name(&self) -> &'static str {
        "hydrophobic-atoms"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        &[FeatureType::HydrophobicAtom]
    }

    fn add(&self, ctx: &UnitContext<'_>, builder: &mut FeaturesBuilder) {
        for i in 0..ctx.unit.len() {
            let hydrophobic = match ctx.unit.element(i) {
                Element::F => true,
                Element::C => {
                    let mut apolar = true;
                    ctx.structure.each_bonded_atom(ctx.unit, i, |other, j, _| {
                        apolar &= matches!(other.element(j), Element::C | Element::H);
                    });
                    apolar
                }
                _ => false,
            };
            if hydrophobic {
                ctx.add_one(builder, FeatureType::HydrophobicAtom, FeatureGroup::None, i);
            }
        }
    }
}

pub struct HydrophobicTester {
    distance_max: f64,
}

impl HydrophobicTester {
    pub fn new(params: &HydrophobicParams) -> Self {
        Self {
            distance_max: params.distance_max,
        }
    }
}

impl LinkTester for HydrophobicTester {
    fn family(&self) -> InteractionFamily {
        InteractionFamily::Hydrophobic
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
        if a.feature_type() != FeatureType::HydrophobicAtom
            || b.feature_type() != FeatureType::HydrophobicAtom
        {
            return None;
        }
        if a.unit.element(a.atom()) == Element::F && b.unit.element(b.atom()) == Element::F {
            return None;
        }
        valid_pair(structure, a, b).then_some(InteractionType::Hydrophobic)
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::fixtures::structure;
    use super::*;
    use crate::core::models::topology::BondOrder;

    #[test]
    fn polar_carbons_are_not_hydrophobic() {
        let s = structure(
            &[(
                "LIG",
                &[
                    ("C1", Element::C, [0.0, 0.0, 0.0]),
                    ("C2", Element::C, [1.5, 0.0, 0.0]),
                    ("O1", Element::O, [2.3, 1.2, 0.0]),
                    ("F1", Element::F, [-1.3, 0.0, 0.0]),
                ],
            )],
            &[
                (0, 1, BondOrder::Single),
                (1, 2, BondOrder::Single),
                (0, 3, BondOrder::Single),
            ],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let mut builder = FeaturesBuilder::new(4, 4);
        HydrophobicAtomProvider.add(&ctx, &mut builder);
        let features = builder.get_features(unit.len());
        let members: Vec<_> = (0..features.len()).map(|i| features.members(i)[0]).collect();
        assert_eq!(members, vec![3]);
    }

    #[test]
    fn fluorine_pairs_are_rejected() {
        let s = structure(
            &[
                ("LIG", &[("F1", Element::F, [0.0, 0.0, 0.0])]),
                ("LIH", &[("F2", Element::F, [3.0, 0.0, 0.0])]),
                ("LII", &[("C1", Element::C, [0.0, 3.0, 0.0])]),
            ],
            &[],
        );
        let unit = s.units().next().unwrap();
        let ctx = UnitContext::new(&s, unit);
        let mut builder = FeaturesBuilder::new(4, 4);
        HydrophobicAtomProvider.add(&ctx, &mut builder);
        let features = builder.get_features(unit.len());
        let info = |i| FeatureInfo::new(unit, &features, i);

        let tester = HydrophobicTester::new(&HydrophobicParams::default());
        assert_eq!(tester.get_type(&s, &info(0), &info(1), 9.0), None);
        assert_eq!(
            tester.get_type(&s, &info(0), &info(2), 9.0),
            Some(InteractionType::Hydrophobic)
        );
    }
}
