//! `wear schema` - digest, defaults and style resolution

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use wear_style::{SettingId, SettingKind, StyleOption, UserStyle, UserStyleData, UserStyleSchema};

use crate::cli::{ResolveArgs, SchemaCommands};

pub fn run(command: SchemaCommands) -> Result<()> {
    match command {
        SchemaCommands::Digest { schema } => {
            let schema = load_schema(&schema)?;
            println!("{}", schema.digest_hash());
        }
        SchemaCommands::Default { schema } => {
            let schema = load_schema(&schema)?;
            print!("{}", describe(&schema, &schema.default_style())?);
        }
        SchemaCommands::Resolve(args) => resolve(args)?,
    }
    Ok(())
}

fn resolve(args: ResolveArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;

    let mut entries: Vec<(String, String)> = Vec::new();
    if let Some(path) = &args.style {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let stored: BTreeMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        entries.extend(stored);
    }
    for assignment in &args.set {
        entries.push(parse_assignment(assignment)?);
    }

    let data = style_data(&schema, entries.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let style = UserStyle::from_data(&data, &schema);
    print!("{}", describe(&schema, &style)?);
    Ok(())
}

fn load_schema(path: &Path) -> Result<UserStyleSchema> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let schema: UserStyleSchema = serde_json::from_str(&content)
        .with_context(|| format!("Invalid schema in {}", path.display()))?;
    debug!("loaded {} settings from {}", schema.len(), path.display());
    Ok(schema)
}

fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    let Some((setting, value)) = assignment.split_once('=') else {
        anyhow::bail!("Expected SETTING=VALUE, got `{}`", assignment);
    };
    Ok((setting.trim().to_string(), value.trim().to_string()))
}

/// Build wire data from human-readable option values.
///
/// Range and boolean settings take their value literally; every other
/// setting takes the option id as text. Values that don't parse are passed
/// through as text so resolution falls back to the default.
fn style_data<'a>(
    schema: &UserStyleSchema,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> UserStyleData {
    let mut data = UserStyleData::new();
    for (setting, value) in entries {
        let kind = SettingId::new(setting)
            .ok()
            .and_then(|id| schema.get(&id))
            .map(|s| s.kind());
        if kind.is_none() {
            warn!("schema has no setting `{}`", setting);
        }
        let bytes = match kind {
            Some(SettingKind::Boolean) => value.parse().ok().map(StyleOption::boolean),
            Some(SettingKind::DoubleRange { .. }) => {
                value.parse().ok().map(StyleOption::double_range)
            }
            Some(SettingKind::LongRange { .. }) => {
                value.parse().ok().map(StyleOption::long_range)
            }
            _ => None,
        }
        .map(|option| option.id().as_bytes().to_vec())
        .unwrap_or_else(|| value.as_bytes().to_vec());
        data.insert(setting, bytes);
    }
    data
}

fn describe(schema: &UserStyleSchema, style: &UserStyle) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (id, option) in style.iter() {
        writeln!(out, "{} = {}", id, option_label(option))?;
    }
    match schema.find_complication_slots_option_for_user_style(style) {
        Some(slots) => {
            writeln!(out, "complication slots: {}", slots.display_name)?;
            for overlay in &slots.overlays {
                writeln!(
                    out,
                    "  slot {}: enabled={:?} bounds={:?}",
                    overlay.complication_slot_id, overlay.enabled, overlay.bounds
                )?;
            }
        }
        None => writeln!(out, "complication slots: none")?,
    }
    writeln!(out, "digest: {}", schema.digest_hash())?;
    Ok(out)
}

fn option_label(option: &StyleOption) -> String {
    if let Some(value) = option.as_bool() {
        return value.to_string();
    }
    if let Some(value) = option.as_f64() {
        return value.to_string();
    }
    if let Some(value) = option.as_i64() {
        return value.to_string();
    }
    match option.display_name() {
        Some(name) => format!("{} ({})", option.id(), name),
        None => option.id().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wear_style::{ListOption, OptionId, UserStyleSetting, WatchFaceLayer};

    fn schema() -> UserStyleSchema {
        let color = UserStyleSetting::list(
            SettingId::new("color").unwrap(),
            "Color",
            "Dial color",
            [WatchFaceLayer::Base],
            vec![
                StyleOption::list(OptionId::from_name("red").unwrap(), ListOption::new("Red")),
                StyleOption::list(OptionId::from_name("blue").unwrap(), ListOption::new("Blue")),
            ],
            0,
        )
        .unwrap();
        let hands = UserStyleSetting::double_range(
            SettingId::new("hands").unwrap(),
            "Hands",
            "Hand length",
            [WatchFaceLayer::ComplicationsOverlay],
            0.0,
            1.0,
            0.75,
        )
        .unwrap();
        UserStyleSchema::new(vec![color, hands]).unwrap()
    }

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("a = b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_assignment("nothing").is_err());
    }

    #[test]
    fn range_values_are_encoded_numerically() {
        let schema = schema();
        let data = style_data(&schema, [("hands", "0.5"), ("color", "blue")]);
        let style = UserStyle::from_data(&data, &schema);

        let hands = style.get(&SettingId::new("hands").unwrap()).unwrap();
        assert_eq!(hands.as_f64(), Some(0.5));
        let color = style.get(&SettingId::new("color").unwrap()).unwrap();
        assert_eq!(color.id(), &OptionId::from_name("blue").unwrap());
    }

    #[test]
    fn unparseable_range_value_falls_back_to_default() {
        let schema = schema();
        let data = style_data(&schema, [("hands", "long")]);
        let style = UserStyle::from_data(&data, &schema);
        let hands = style.get(&SettingId::new("hands").unwrap()).unwrap();
        assert_eq!(hands.as_f64(), Some(0.75));
    }

    #[test]
    fn describe_lists_every_setting() {
        let schema = schema();
        let text = describe(&schema, &schema.default_style()).unwrap();
        assert!(text.contains("color = red (Red)"));
        assert!(text.contains("hands = 0.75"));
        assert!(text.contains("complication slots: none"));
    }
}
