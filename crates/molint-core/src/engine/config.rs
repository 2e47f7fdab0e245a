use super::families::InteractionFamily;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Parameter '{family}.{name}' = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        family: &'static str,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown parameter: '{0}'")]
    UnknownParameter(String),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Shape of one tunable parameter, advertised so hosts can build controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParamKind {
    /// Length in Ångström.
    Distance { default: f64, min: f64, max: f64 },
    /// Angle in degrees.
    Angle { default: f64, min: f64, max: f64 },
    Flag { default: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn distance(
        name: &'static str,
        description: &'static str,
        default: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Distance { default, min, max },
        }
    }

    pub const fn angle(
        name: &'static str,
        description: &'static str,
        default: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Angle { default, min, max },
        }
    }

    pub const fn flag(name: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            name,
            description,
            kind: ParamKind::Flag { default },
        }
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        match self.kind {
            ParamKind::Distance { min, max, .. } | ParamKind::Angle { min, max, .. } => {
                Some((min, max))
            }
            ParamKind::Flag { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct IonicParams {
    pub enabled: bool,
    pub distance_max: f64,
}

impl Default for IonicParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct PiStackingParams {
    pub enabled: bool,
    pub distance_max: f64,
    pub offset_max: f64,
    pub angle_dev_max: f64,
}

impl Default for PiStackingParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 5.5,
            offset_max: 2.0,
            angle_dev_max: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct CationPiParams {
    pub enabled: bool,
    pub distance_max: f64,
    pub offset_max: f64,
}

impl Default for CationPiParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 6.0,
            offset_max: 2.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct HalogenBondParams {
    pub enabled: bool,
    pub distance_max: f64,
    pub angle_max: f64,
}

impl Default for HalogenBondParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 4.0,
            angle_max: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct HydrogenBondParams {
    pub enabled: bool,
    pub distance_max: f64,
    pub sulfur_distance_max: f64,
    pub acc_angle_dev_max: f64,
    pub don_angle_dev_max: f64,
    pub acc_out_of_plane_angle_max: f64,
    pub don_out_of_plane_angle_max: f64,
    pub include_backbone: bool,
    pub include_water: bool,
}

impl Default for HydrogenBondParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 3.5,
            sulfur_distance_max: 4.1,
            acc_angle_dev_max: 45.0,
            don_angle_dev_max: 45.0,
            acc_out_of_plane_angle_max: 90.0,
            don_out_of_plane_angle_max: 45.0,
            include_backbone: true,
            include_water: false,
        }
    }
}

/// Weak (C-H donor) hydrogen bonds share the hydrogen bond geometry but are
/// off by default and reach slightly further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct WeakHydrogenBondParams {
    pub enabled: bool,
    pub distance_max: f64,
    pub sulfur_distance_max: f64,
    pub acc_angle_dev_max: f64,
    pub don_angle_dev_max: f64,
    pub acc_out_of_plane_angle_max: f64,
    pub don_out_of_plane_angle_max: f64,
    pub include_backbone: bool,
    pub include_water: bool,
}

impl Default for WeakHydrogenBondParams {
    fn default() -> Self {
        Self {
            enabled: false,
            distance_max: 4.0,
            sulfur_distance_max: 4.1,
            acc_angle_dev_max: 45.0,
            don_angle_dev_max: 45.0,
            acc_out_of_plane_angle_max: 90.0,
            don_out_of_plane_angle_max: 45.0,
            include_backbone: true,
            include_water: false,
        }
    }
}

impl From<&WeakHydrogenBondParams> for HydrogenBondParams {
    fn from(p: &WeakHydrogenBondParams) -> Self {
        Self {
            enabled: p.enabled,
            distance_max: p.distance_max,
            sulfur_distance_max: p.sulfur_distance_max,
            acc_angle_dev_max: p.acc_angle_dev_max,
            don_angle_dev_max: p.don_angle_dev_max,
            acc_out_of_plane_angle_max: p.acc_out_of_plane_angle_max,
            don_out_of_plane_angle_max: p.don_out_of_plane_angle_max,
            include_backbone: p.include_backbone,
            include_water: p.include_water,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct HydrophobicParams {
    pub enabled: bool,
    pub distance_max: f64,
}

impl Default for HydrophobicParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct MetalCoordinationParams {
    pub enabled: bool,
    pub distance_max: f64,
}

impl Default for MetalCoordinationParams {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_max: 3.0,
        }
    }
}

/// The complete parameter set of an interaction computation.
///
/// Deserialized from kebab-case TOML; missing sections and keys take their
/// defaults, unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct InteractionsParams {
    pub refine: bool,
    pub ionic: IonicParams,
    pub pi_stacking: PiStackingParams,
    pub cation_pi: CationPiParams,
    pub halogen_bonds: HalogenBondParams,
    pub hydrogen_bonds: HydrogenBondParams,
    pub weak_hydrogen_bonds: WeakHydrogenBondParams,
    pub hydrophobic: HydrophobicParams,
    pub metal_coordination: MetalCoordinationParams,
}

impl Default for InteractionsParams {
    fn default() -> Self {
        Self {
            refine: true,
            ionic: IonicParams::default(),
            pi_stacking: PiStackingParams::default(),
            cation_pi: CationPiParams::default(),
            halogen_bonds: HalogenBondParams::default(),
            hydrogen_bonds: HydrogenBondParams::default(),
            weak_hydrogen_bonds: WeakHydrogenBondParams::default(),
            hydrophobic: HydrophobicParams::default(),
            metal_coordination: MetalCoordinationParams::default(),
        }
    }
}

impl InteractionsParams {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads, parses and validates a parameter file.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let params = Self::from_toml_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.display().to_string(),
            source: e,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "<params>".to_string(),
            value: String::new(),
            reason: e.to_string(),
        })
    }

    fn to_table(&self) -> Result<toml::Table, ConfigError> {
        match toml::Value::try_from(self) {
            Ok(toml::Value::Table(table)) => Ok(table),
            Ok(_) => Err(ConfigError::InvalidValue {
                key: "<params>".to_string(),
                value: String::new(),
                reason: "parameters did not serialize to a table".to_string(),
            }),
            Err(e) => Err(ConfigError::InvalidValue {
                key: "<params>".to_string(),
                value: String::new(),
                reason: e.to_string(),
            }),
        }
    }

    /// Checks every numeric parameter against its family's declared range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let table = self.to_table()?;
        for family in InteractionFamily::ALL {
            let section = table.get(family.name()).and_then(toml::Value::as_table);
            for spec in family.param_specs() {
                let Some((min, max)) = spec.range() else {
                    continue;
                };
                let value = section
                    .and_then(|s| s.get(spec.name))
                    .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
                    .ok_or_else(|| {
                        ConfigError::MissingParameter(format!("{}.{}", family.name(), spec.name))
                    })?;
                if !(min..=max).contains(&value) {
                    return Err(ConfigError::OutOfRange {
                        family: family.name(),
                        name: spec.name,
                        value,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns a copy with `key` (`family.param` or `refine`) set to the TOML
    /// literal `raw`.
    pub fn with_override(&self, key: &str, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason,
        };
        let value = toml::from_str::<toml::Table>(&format!("value = {raw}"))
            .ok()
            .and_then(|mut t| t.remove("value"))
            .ok_or_else(|| invalid("not a TOML literal".to_string()))?;

        let mut table = self.to_table()?;
        match key.split_once('.') {
            None if key == "refine" => {
                table.insert(key.to_string(), value);
            }
            Some((family_name, param)) => {
                let family = family_name
                    .parse::<InteractionFamily>()
                    .map_err(|_| ConfigError::UnknownParameter(key.to_string()))?;
                if !family.param_specs().iter().any(|s| s.name == param) {
                    return Err(ConfigError::UnknownParameter(key.to_string()));
                }
                let section = table
                    .entry(family.name())
                    .or_insert(toml::Value::Table(toml::Table::new()));
                let toml::Value::Table(section) = section else {
                    return Err(invalid("family section is not a table".to_string()));
                };
                section.insert(param.to_string(), value);
            }
            None => return Err(ConfigError::UnknownParameter(key.to_string())),
        }

        toml::Value::Table(table)
            .try_into::<InteractionsParams>()
            .map_err(|e| invalid(e.to_string()))
    }

    pub fn is_enabled(&self, family: InteractionFamily) -> bool {
        match family {
            InteractionFamily::Ionic => self.ionic.enabled,
            InteractionFamily::PiStacking => self.pi_stacking.enabled,
            InteractionFamily::CationPi => self.cation_pi.enabled,
            InteractionFamily::HalogenBonds => self.halogen_bonds.enabled,
            InteractionFamily::HydrogenBonds => self.hydrogen_bonds.enabled,
            InteractionFamily::WeakHydrogenBonds => self.weak_hydrogen_bonds.enabled,
            InteractionFamily::Hydrophobic => self.hydrophobic.enabled,
            InteractionFamily::MetalCoordination => self.metal_coordination.enabled,
        }
    }

    pub fn enabled_families(&self) -> Vec<InteractionFamily> {
        InteractionFamily::ALL
            .into_iter()
            .filter(|&f| self.is_enabled(f))
            .collect()
    }

    /// A stable hash of every parameter value, used as part of cache keys.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        format!("{self:?}").hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Default)]
pub struct InteractionsParamsBuilder {
    refine: Option<bool>,
    ionic: Option<IonicParams>,
    pi_stacking: Option<PiStackingParams>,
    cation_pi: Option<CationPiParams>,
    halogen_bonds: Option<HalogenBondParams>,
    hydrogen_bonds: Option<HydrogenBondParams>,
    weak_hydrogen_bonds: Option<WeakHydrogenBondParams>,
    hydrophobic: Option<HydrophobicParams>,
    metal_coordination: Option<MetalCoordinationParams>,
    disabled: Vec<InteractionFamily>,
    enabled: Vec<InteractionFamily>,
}

impl InteractionsParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refine(mut self, refine: bool) -> Self {
        self.refine = Some(refine);
        self
    }
    pub fn ionic(mut self, params: IonicParams) -> Self {
        self.ionic = Some(params);
        self
    }
    pub fn pi_stacking(mut self, params: PiStackingParams) -> Self {
        self.pi_stacking = Some(params);
        self
    }
    pub fn cation_pi(mut self, params: CationPiParams) -> Self {
        self.cation_pi = Some(params);
        self
    }
    pub fn halogen_bonds(mut self, params: HalogenBondParams) -> Self {
        self.halogen_bonds = Some(params);
        self
    }
    pub fn hydrogen_bonds(mut self, params: HydrogenBondParams) -> Self {
        self.hydrogen_bonds = Some(params);
        self
    }
    pub fn weak_hydrogen_bonds(mut self, params: WeakHydrogenBondParams) -> Self {
        self.weak_hydrogen_bonds = Some(params);
        self
    }
    pub fn hydrophobic(mut self, params: HydrophobicParams) -> Self {
        self.hydrophobic = Some(params);
        self
    }
    pub fn metal_coordination(mut self, params: MetalCoordinationParams) -> Self {
        self.metal_coordination = Some(params);
        self
    }
    pub fn enable(mut self, family: InteractionFamily) -> Self {
        self.disabled.retain(|&f| f != family);
        self.enabled.push(family);
        self
    }
    pub fn disable(mut self, family: InteractionFamily) -> Self {
        self.enabled.retain(|&f| f != family);
        self.disabled.push(family);
        self
    }
    /// Disables every family except `families`.
    pub fn only(mut self, families: &[InteractionFamily]) -> Self {
        self.enabled = families.to_vec();
        self.disabled = InteractionFamily::ALL
            .into_iter()
            .filter(|f| !families.contains(f))
            .collect();
        self
    }

    pub fn build(self) -> Result<InteractionsParams, ConfigError> {
        let mut params = InteractionsParams {
            refine: self.refine.unwrap_or(true),
            ionic: self.ionic.unwrap_or_default(),
            pi_stacking: self.pi_stacking.unwrap_or_default(),
            cation_pi: self.cation_pi.unwrap_or_default(),
            halogen_bonds: self.halogen_bonds.unwrap_or_default(),
            hydrogen_bonds: self.hydrogen_bonds.unwrap_or_default(),
            weak_hydrogen_bonds: self.weak_hydrogen_bonds.unwrap_or_default(),
            hydrophobic: self.hydrophobic.unwrap_or_default(),
            metal_coordination: self.metal_coordination.unwrap_or_default(),
        };
        for family in self.enabled {
            params.set_enabled(family, true);
        }
        for family in self.disabled {
            params.set_enabled(family, false);
        }
        params.validate()?;
        Ok(params)
    }
}

impl InteractionsParams {
    fn set_enabled(&mut self, family: InteractionFamily, enabled: bool) {
        match family {
            InteractionFamily::Ionic => self.ionic.enabled = enabled,
            InteractionFamily::PiStacking => self.pi_stacking.enabled = enabled,
            InteractionFamily::CationPi => self.cation_pi.enabled = enabled,
            InteractionFamily::HalogenBonds => self.halogen_bonds.enabled = enabled,
            InteractionFamily::HydrogenBonds => self.hydrogen_bonds.enabled = enabled,
            InteractionFamily::WeakHydrogenBonds => self.weak_hydrogen_bonds.enabled = enabled,
            InteractionFamily::Hydrophobic => self.hydrophobic.enabled = enabled,
            InteractionFamily::MetalCoordination => self.metal_coordination.enabled = enabled,
        }
    }
}
