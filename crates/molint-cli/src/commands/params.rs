use crate::cli::ParamsArgs;
use crate::error::{CliError, Result};
use molint::engine::config::InteractionsParams;
use molint::engine::families::InteractionFamily;
use tracing::{debug, info};

pub fn run(args: ParamsArgs) -> Result<()> {
    let params = resolve(&args)?;
    info!(
        "Resolved parameters enable {} families (refine = {}).",
        params.enabled_families().len(),
        params.refine
    );
    let text = params.to_toml_string()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("Wrote resolved parameters to {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Builds the effective parameter set: file (or defaults), then family
/// selection, then `--set` overrides. The result is validated.
pub fn resolve(args: &ParamsArgs) -> Result<InteractionsParams> {
    let mut params = match &args.config {
        Some(path) => {
            debug!("Loading parameters from file: {:?}", path);
            InteractionsParams::load(path)?
        }
        None => InteractionsParams::default(),
    };

    if !args.only.is_empty() {
        let only = parse_families(&args.only)?;
        for family in InteractionFamily::ALL {
            let enabled = only.contains(&family);
            params = params.with_override(
                &format!("{}.enabled", family.name()),
                &enabled.to_string(),
            )?;
        }
    }
    for family in parse_families(&args.disable)? {
        params = params.with_override(&format!("{}.enabled", family.name()), "false")?;
    }
    if args.no_refine {
        params.refine = false;
    }

    for kv_pair in &args.set_values {
        let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Argument(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        debug!("Applying override {} = {}", key, value);
        params = params.with_override(key.trim(), value.trim())?;
    }

    params.validate()?;
    Ok(params)
}

fn parse_families(names: &[String]) -> Result<Vec<InteractionFamily>> {
    names
        .iter()
        .map(|name| {
            name.trim()
                .parse::<InteractionFamily>()
                .map_err(|e| CliError::Argument(e.to_string()))
        })
        .collect()
}
