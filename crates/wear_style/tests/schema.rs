use pretty_assertions::assert_eq;
use wear_style::{
    ComplicationSlotOverlay, ComplicationSlotsOption, ListOption, OptionId, SettingId,
    StyleError, StyleOption, UserStyle, UserStyleData, UserStyleSchema, UserStyleSetting,
    WatchFaceLayer,
};

fn sid(id: &str) -> SettingId {
    SettingId::new(id).unwrap()
}

fn oid(id: &str) -> OptionId {
    OptionId::from_name(id).unwrap()
}

fn list_option(name: &str, children: &[&str]) -> StyleOption {
    StyleOption::list(
        oid(name),
        ListOption::new(name).with_child_settings(children.iter().map(|c| sid(c))),
    )
}

fn list(id: &str, options: Vec<StyleOption>) -> UserStyleSetting {
    UserStyleSetting::list(sid(id), id, "", [WatchFaceLayer::Base], options, 0).unwrap()
}

fn slots(id: &str, options: &[(&str, i32)]) -> UserStyleSetting {
    let options = options
        .iter()
        .map(|(name, slot)| {
            StyleOption::complication_slots(
                oid(name),
                ComplicationSlotsOption::new(*name)
                    .with_overlays([ComplicationSlotOverlay::new(*slot).with_enabled(false)]),
            )
        })
        .collect();
    UserStyleSetting::complication_slots(
        sid(id),
        id,
        "",
        [WatchFaceLayer::Complications],
        options,
        0,
    )
    .unwrap()
}

/// mode: analog -> [layout], digital -> []
/// layout: left/right complication slots
fn nested_schema() -> UserStyleSchema {
    UserStyleSchema::new(vec![
        list(
            "mode",
            vec![list_option("analog", &["layout"]), list_option("digital", &[])],
        ),
        slots("layout", &[("left", 1), ("right", 2)]),
    ])
    .unwrap()
}

#[test]
fn multiple_custom_value_settings_rejected() {
    let a = UserStyleSetting::custom_value(oid("a")).unwrap();
    let b = UserStyleSetting::custom_value_with_id(sid("CustomValue2"), oid("b")).unwrap();
    assert_eq!(
        UserStyleSchema::new(vec![a.clone(), b]).unwrap_err(),
        StyleError::MultipleCustomValueSettings(2)
    );

    let single = UserStyleSchema::new(vec![a, list("color", vec![list_option("red", &[])])]);
    assert!(single.is_ok());
}

#[test]
fn duplicate_option_ids_fail_schema_deserialization() {
    let schema = UserStyleSchema::new(vec![list(
        "color",
        vec![list_option("red", &[]), list_option("blue", &[])],
    )])
    .unwrap();
    let json = serde_json::to_string(&schema).unwrap();
    assert!(serde_json::from_str::<UserStyleSchema>(&json).is_ok());

    let duplicated = json.replace("\"Blue\"", "\"Red\"");
    let blue_bytes = format!("{:?}", b"blue".to_vec()).replace(' ', "");
    let red_bytes = format!("{:?}", b"red".to_vec()).replace(' ', "");
    let duplicated = duplicated.replace(&blue_bytes, &red_bytes);
    assert!(serde_json::from_str::<UserStyleSchema>(&duplicated).is_err());
}

#[test]
fn conflicting_complication_settings_rejected() {
    let two_roots = UserStyleSchema::new(vec![
        slots("a", &[("x", 1)]),
        slots("b", &[("y", 2)]),
    ]);
    assert_eq!(
        two_roots.unwrap_err(),
        StyleError::ConflictingComplicationSlotsSettings(2)
    );

    let nested = UserStyleSchema::new(vec![
        UserStyleSetting::complication_slots(
            sid("outer"),
            "",
            "",
            [],
            vec![StyleOption::complication_slots(
                oid("o"),
                ComplicationSlotsOption::new("o").with_child_settings([sid("inner")]),
            )],
            0,
        )
        .unwrap(),
        slots("inner", &[("i", 1)]),
    ]);
    assert!(matches!(
        nested,
        Err(StyleError::ConflictingComplicationSlotsSettings(_))
    ));

    // Alternative branches are never active together
    let branches = UserStyleSchema::new(vec![
        list(
            "mode",
            vec![list_option("a", &["slots_a"]), list_option("b", &["slots_b"])],
        ),
        slots("slots_a", &[("x", 1)]),
        slots("slots_b", &[("y", 1)]),
    ]);
    assert!(branches.is_ok());
}

#[test]
fn find_complication_option_follows_selected_path() {
    let schema = nested_schema();

    let mut data = UserStyleData::new();
    data.insert("mode", "analog");
    data.insert("layout", "right");
    let style = UserStyle::from_data(&data, &schema);
    let found = schema
        .find_complication_slots_option_for_user_style(&style)
        .unwrap();
    assert_eq!(found.display_name, "right");
    assert_eq!(found.overlays[0].complication_slot_id, 2);

    data.insert("mode", "digital");
    let style = UserStyle::from_data(&data, &schema);
    assert!(schema
        .find_complication_slots_option_for_user_style(&style)
        .is_none());
}

#[test]
fn missing_or_unknown_entries_resolve_to_default() {
    let schema = nested_schema();
    let empty = UserStyle::from_data(&UserStyleData::new(), &schema);
    assert_eq!(empty, schema.default_style());

    let mut data = UserStyleData::new();
    data.insert("mode", "solar");
    let style = UserStyle::from_data(&data, &schema);
    assert_eq!(style.get(&sid("mode")).unwrap().id(), &oid("analog"));
}

#[test]
fn merge_reports_no_change() {
    let schema = nested_schema();
    let base = schema.default_style();

    assert_eq!(base.merge(&base), None);

    let mut data = UserStyleData::new();
    data.insert("mode", "analog");
    data.insert("not_in_schema", "x");
    assert_eq!(base.merge_data(&data, &schema), None);

    data.insert("mode", "digital");
    let merged = base.merge_data(&data, &schema).unwrap();
    assert_eq!(merged.get(&sid("mode")).unwrap().id(), &oid("digital"));
    assert_eq!(merged.get(&sid("layout")), base.get(&sid("layout")));
    assert_eq!(merged.len(), base.len());
}

#[test]
fn merge_ignores_settings_outside_base() {
    let schema = nested_schema();
    let other_schema =
        UserStyleSchema::new(vec![list("color", vec![list_option("red", &[])])]).unwrap();
    let base = schema.default_style();
    assert_eq!(base.merge(&other_schema.default_style()), None);
}

#[test]
fn double_range_scenario() {
    let setting = UserStyleSetting::double_range(
        sid("opacity"),
        "Opacity",
        "",
        [WatchFaceLayer::Base],
        0.0,
        1.0,
        0.75,
    )
    .unwrap();
    assert_eq!(setting.option_for_id(&oid("not a number")).as_f64(), Some(0.75));
    assert_eq!(setting.option_for_id(&oid("-1")).as_f64(), Some(0.75));
    let half = OptionId::new(0.5f64.to_be_bytes().to_vec()).unwrap();
    assert_eq!(setting.option_for_id(&half).as_f64(), Some(0.5));
}
