use crate::cli::FamiliesArgs;
use crate::error::{CliError, Result};
use itertools::Itertools;
use molint::engine::config::{InteractionsParams, ParamKind, ParamSpec};
use molint::engine::families::InteractionFamily;
use std::fmt::Write;
use tracing::info;

pub fn run(args: FamiliesArgs) -> Result<()> {
    let families = match &args.family {
        Some(name) => vec![
            name.parse::<InteractionFamily>()
                .map_err(|e| CliError::Argument(e.to_string()))?,
        ],
        None => InteractionFamily::ALL.to_vec(),
    };
    info!("Listing {} interaction families.", families.len());

    let defaults = InteractionsParams::default();
    let text = families
        .into_iter()
        .map(|family| render(family, &defaults))
        .join("\n");
    print!("{}", text);
    Ok(())
}

fn render(family: InteractionFamily, defaults: &InteractionsParams) -> String {
    let mut out = String::new();
    let state = if defaults.is_enabled(family) {
        "enabled"
    } else {
        "disabled"
    };
    let _ = writeln!(
        out,
        "{} ({}) [{} by default]",
        family.name(),
        family.label(),
        state
    );
    let _ = writeln!(
        out,
        "  features: {}",
        family.required_features().iter().join(", ")
    );
    for spec in family.param_specs() {
        let _ = writeln!(out, "  {}", render_spec(spec));
    }
    out
}

fn render_spec(spec: &ParamSpec) -> String {
    let value = match spec.kind {
        ParamKind::Distance { default, min, max } => {
            format!("= {default} Å (range {min}..={max})")
        }
        ParamKind::Angle { default, min, max } => {
            format!("= {default}° (range {min}..={max})")
        }
        ParamKind::Flag { default } => format!("= {default}"),
    };
    format!("{:<28} {:<32} {}", spec.name, value, spec.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_parameters_with_ranges() {
        let text = render(InteractionFamily::HalogenBonds, &InteractionsParams::default());
        assert!(text.starts_with("halogen-bonds (Halogen Bonds) [enabled by default]"));
        assert!(text.contains("distance-max"));
        assert!(text.contains("= 4 Å (range 1..=5)"));
        assert!(text.contains("= 30° (range 0..=60)"));
    }

    #[test]
    fn weak_hydrogen_bonds_are_reported_disabled() {
        let text = render(
            InteractionFamily::WeakHydrogenBonds,
            &InteractionsParams::default(),
        );
        assert!(text.contains("[disabled by default]"));
    }

    #[test]
    fn unknown_family_is_an_argument_error() {
        let args = FamiliesArgs {
            family: Some("van-der-waals".to_string()),
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }

    #[test]
    fn single_family_can_be_listed() {
        let args = FamiliesArgs {
            family: Some("ionic".to_string()),
        };
        assert!(run(args).is_ok());
    }
}
