//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zitems::domain::effect::Effect;
use zitems::domain::item::AttributeValue;

#[derive(Debug, Parser)]
#[command(name = "zitems")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Validate, inspect and exercise zItems definition folders")]
pub struct Cli {
    /// Settings file (defaults to `config.*` in the working directory, if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log loads and bindings to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a definitions folder and list every issue
    Check {
        dir: PathBuf,
    },
    /// Print the recipe bindings a definitions folder would install
    Recipes {
        dir: PathBuf,
    },
    /// Create an item and print its serialized form as hex
    Give {
        dir: PathBuf,
        /// Item key, plain or namespaced (`zitems:ruby_sword`)
        key: String,
        #[arg(short, long, default_value_t = 1)]
        amount: u16,
        /// Attribute override, repeatable (`--set damage=12`)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_attribute)]
        attributes: Vec<(String, AttributeValue)>,
        /// Enchantment override, repeatable (`--enchant sharpness=5`)
        #[arg(long = "enchant", value_name = "NAME=LEVEL", value_parser = parse_enchantment)]
        enchantments: Vec<(String, u16)>,
        /// Additional effect, repeatable (`--effect hammer=HAMMER`)
        #[arg(long = "effect", value_name = "ID=TYPE", value_parser = parse_effect)]
        effects: Vec<Effect>,
    },
    /// Decode a serialized item and print it as JSON
    Inspect {
        dir: PathBuf,
        /// Serialized item as printed by `give`
        hex: String,
    },
}

fn split_assignment(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// Literals follow the definition file rules: booleans, then integers, then floats, else text.
pub fn parse_attribute(raw: &str) -> Result<(String, AttributeValue), String> {
    let (name, value) = split_assignment(raw)?;
    let value = if let Ok(b) = value.parse::<bool>() {
        AttributeValue::Bool(b)
    } else if let Ok(i) = value.parse::<i64>() {
        AttributeValue::Int(i)
    } else if let Ok(f) = value.parse::<f64>() {
        AttributeValue::Float(f)
    } else {
        AttributeValue::Text(value.to_owned())
    };
    Ok((name.to_owned(), value))
}

pub fn parse_enchantment(raw: &str) -> Result<(String, u16), String> {
    let (name, level) = split_assignment(raw)?;
    let level = level.parse::<u16>().map_err(|e| format!("invalid level '{level}': {e}"))?;
    Ok((name.to_owned(), level))
}

pub fn parse_effect(raw: &str) -> Result<Effect, String> {
    let (id, kind) = split_assignment(raw)?;
    if !Effect::is_valid_id(id) || kind.is_empty() {
        return Err(format!("expected ID=TYPE with a lower-case id, got '{raw}'"));
    }
    Ok(Effect::new(id, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_literals() {
        assert_eq!(parse_attribute("glow=true").unwrap().1, AttributeValue::Bool(true));
        assert_eq!(parse_attribute("damage=12").unwrap().1, AttributeValue::Int(12));
        assert_eq!(parse_attribute("speed = 1.5").unwrap(), ("speed".to_owned(), AttributeValue::Float(1.5)));
        assert_eq!(parse_attribute("owner=Alex=1").unwrap().1, AttributeValue::Text("Alex=1".to_owned()));
        assert!(parse_attribute("=5").is_err());
        assert!(parse_attribute("damage").is_err());
    }

    #[test]
    fn enchantment_levels() {
        assert_eq!(parse_enchantment("sharpness=5").unwrap(), ("sharpness".to_owned(), 5));
        assert!(parse_enchantment("sharpness=-1").is_err());
    }

    #[test]
    fn effect_assignments() {
        let effect = parse_effect("hammer=hammer").unwrap();
        assert_eq!((effect.id.as_str(), effect.kind.as_str()), ("hammer", "HAMMER"));
        assert!(parse_effect("Hammer=HAMMER").is_err());
        assert!(parse_effect("hammer=").is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
