//! Tag schema: which launch parameters a tag implies.
//!
//! The table is compiled in and ships with the launcher. Tags it does not know
//! are plain labels and contribute no parameters.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::tags::TagSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Bool,
    Int,
    Float,
    String,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
        }
    }

    /// Parse user input into a typed value.
    pub fn parse(&self, input: &str) -> Result<ParamValue, ParamError> {
        let raw = input.trim();
        match self {
            ParamType::Bool => match raw.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "on" => Ok(ParamValue::Bool(true)),
                "false" | "no" | "n" | "0" | "off" => Ok(ParamValue::Bool(false)),
                _ => Err(ParamError::InvalidValue {
                    expected: *self,
                    value: raw.to_string(),
                }),
            },
            ParamType::Int => raw.parse::<i64>().map(ParamValue::Int).map_err(|_| {
                ParamError::InvalidValue {
                    expected: *self,
                    value: raw.to_string(),
                }
            }),
            ParamType::Float => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(ParamValue::Float(v)),
                _ => Err(ParamError::InvalidValue {
                    expected: *self,
                    value: raw.to_string(),
                }),
            },
            ParamType::String => Ok(ParamValue::Str(input.to_string())),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed parameter value. `Display` is the command-line form handed to the
/// sketch: Python-style `True`/`False` for bools.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Str(_) => ParamType::String,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(true) => f.write_str("True"),
            ParamValue::Bool(false) => f.write_str("False"),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("'{value}' is not a valid {expected}")]
    InvalidValue { expected: ParamType, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub default: ParamValue,
}

impl ParameterSpec {
    fn new(name: &'static str, default: ParamValue) -> Self {
        Self {
            name,
            kind: default.param_type(),
            default,
        }
    }
}

/// A parameter to prompt for, with the tag that supplied its spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParam {
    pub tag: String,
    pub spec: ParameterSpec,
}

#[derive(Debug, Clone)]
pub struct TagSchema {
    entries: Vec<(&'static str, Vec<ParameterSpec>)>,
}

impl TagSchema {
    /// The table shipped with the launcher.
    pub fn builtin() -> Self {
        use ParamValue::*;
        Self::from_entries(vec![
            (
                "cv",
                vec![
                    ParameterSpec::new("cv", Bool(false)),
                    ParameterSpec::new("camera", Bool(false)),
                    ParameterSpec::new("device", Int(0)),
                    ParameterSpec::new("hands", Bool(false)),
                ],
            ),
            (
                "physics",
                vec![
                    ParameterSpec::new("gravity", Float(9.8)),
                    ParameterSpec::new("friction", Float(0.1)),
                ],
            ),
            (
                "AI",
                vec![ParameterSpec::new("model", Str("default_model".to_string()))],
            ),
        ])
    }

    pub fn from_entries(entries: Vec<(&'static str, Vec<ParameterSpec>)>) -> Self {
        Self { entries }
    }

    pub fn params_for(&self, tag: &str) -> Option<&[ParameterSpec]> {
        self.entries
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, params)| params.as_slice())
    }

    pub fn known_tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Parameters implied by `tags`, grouped by tag in TagSet order and by
    /// declaration order within a tag.
    ///
    /// When two tags declare the same parameter name the later tag's spec wins,
    /// but the parameter keeps the slot where it first appeared.
    pub fn resolve(&self, tags: &TagSet) -> Vec<ResolvedParam> {
        let mut out: Vec<ResolvedParam> = Vec::new();
        for tag in tags.iter() {
            let Some(params) = self.params_for(tag) else {
                continue;
            };
            for spec in params {
                let resolved = ResolvedParam {
                    tag: tag.to_string(),
                    spec: spec.clone(),
                };
                match out.iter_mut().find(|p| p.spec.name == spec.name) {
                    Some(existing) => *existing = resolved,
                    None => out.push(resolved),
                }
            }
        }
        out
    }
}

impl Default for TagSchema {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &[ResolvedParam]) -> Vec<&str> {
        params.iter().map(|p| p.spec.name).collect()
    }

    #[test]
    fn test_cv_and_physics_union() {
        let schema = TagSchema::builtin();
        let tags: TagSet = ["cv", "physics"].into_iter().collect();
        let params = schema.resolve(&tags);
        assert_eq!(
            names(&params),
            vec!["cv", "camera", "device", "hands", "gravity", "friction"]
        );
        let gravity = params.iter().find(|p| p.spec.name == "gravity").unwrap();
        assert_eq!(gravity.spec.default.to_string(), "9.8");
        assert_eq!(gravity.spec.kind, ParamType::Float);
    }

    #[test]
    fn test_tag_order_drives_grouping() {
        let schema = TagSchema::builtin();
        let tags: TagSet = ["AI", "physics"].into_iter().collect();
        assert_eq!(names(&schema.resolve(&tags)), vec!["model", "gravity", "friction"]);
    }

    #[test]
    fn test_unknown_tags_contribute_nothing() {
        let schema = TagSchema::builtin();
        let tags: TagSet = ["generative", "wip"].into_iter().collect();
        assert!(schema.resolve(&tags).is_empty());
        assert!(schema.params_for("Cv").is_none());
    }

    #[test]
    fn test_known_tags_in_table_order() {
        let known: Vec<&str> = TagSchema::builtin().known_tags().collect();
        assert_eq!(known, vec!["cv", "physics", "AI"]);
    }

    #[test]
    fn test_collision_last_tag_wins_keeps_first_slot() {
        let schema = TagSchema::from_entries(vec![
            (
                "audio",
                vec![
                    ParameterSpec::new("device", ParamValue::Int(1)),
                    ParameterSpec::new("volume", ParamValue::Float(0.5)),
                ],
            ),
            ("midi", vec![ParameterSpec::new("device", ParamValue::Str("iac".into()))]),
        ]);
        let tags: TagSet = ["audio", "midi"].into_iter().collect();
        let params = schema.resolve(&tags);
        assert_eq!(names(&params), vec!["device", "volume"]);
        assert_eq!(params[0].tag, "midi");
        assert_eq!(params[0].spec.kind, ParamType::String);
        assert_eq!(params[0].spec.default.to_string(), "iac");
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(ParamType::Bool.parse("Yes"), Ok(ParamValue::Bool(true)));
        assert_eq!(ParamType::Bool.parse("False"), Ok(ParamValue::Bool(false)));
        assert!(ParamType::Bool.parse("maybe").is_err());
        assert_eq!(ParamType::Int.parse(" 2 "), Ok(ParamValue::Int(2)));
        assert!(ParamType::Int.parse("2.5").is_err());
        assert_eq!(ParamType::Float.parse("3"), Ok(ParamValue::Float(3.0)));
        assert!(ParamType::Float.parse("NaN").is_err());
        assert_eq!(
            ParamType::String.parse("my model"),
            Ok(ParamValue::Str("my model".into()))
        );
    }

    #[test]
    fn test_command_line_rendering() {
        assert_eq!(ParamValue::Bool(true).to_string(), "True");
        assert_eq!(ParamValue::Int(0).to_string(), "0");
        assert_eq!(ParamValue::Float(0.1).to_string(), "0.1");
        let err = ParamType::Int.parse("abc").unwrap_err();
        assert_eq!(err.to_string(), "'abc' is not a valid int");
    }
}
