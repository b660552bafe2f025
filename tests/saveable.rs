use savetree::{
    apply, load, save, Error, Loadable, SaveEntry, SaveItem, Saveable, SaveableWrapper,
    TypeRegistry, Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct SubRecord {
    name: String,
}

#[derive(Debug, Default, PartialEq)]
struct Tester {
    int_field: i64,
    list_field: Vec<f64>,
    nested: SubRecord,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_fns::<SubRecord, _, _>(
        "SubRecord",
        |items: &[SaveItem], registry: &TypeRegistry| {
            let entry = match items {
                [SaveItem::Entry(entry)] => entry,
                _ => return Err(Error::message("expected a single representation")),
            };
            let name = savetree::decode(entry, registry)?;
            Ok(Value::custom(SubRecord {
                name: name.as_str().unwrap_or_default().to_string(),
            }))
        },
        |record: &SubRecord| Value::Str(record.name.clone()),
    );
    registry
}

impl Saveable for Tester {
    fn type_tag(&self) -> &str {
        "Tester"
    }

    fn save_data(&self, _for_level_save: bool, registry: &TypeRegistry) -> Result<SaveEntry, Error> {
        let mut record = SaveEntry::new(self.type_tag());
        record.add_assign("int_field", self.int_field, registry)?;
        let list = Value::List(self.list_field.iter().copied().map(Value::Float).collect());
        record.add_assign("list_field", list, registry)?;
        record.add_assign("nested", Value::custom(self.nested.clone()), registry)?;
        Ok(record)
    }
}

impl Loadable for Tester {
    fn assign(&mut self, field: &str, value: Value, _ctx: &mut ()) -> Result<(), Error> {
        match field {
            "int_field" => {
                self.int_field = value
                    .as_int()
                    .ok_or_else(|| Error::message("int_field must be an int"))?;
            }
            "list_field" => {
                let elements = value
                    .as_slice()
                    .ok_or_else(|| Error::message("list_field must be a list"))?;
                self.list_field = elements.iter().filter_map(Value::as_float).collect();
            }
            "nested" => {
                self.nested = value
                    .as_custom()
                    .and_then(|c| c.downcast_ref::<SubRecord>())
                    .cloned()
                    .ok_or_else(|| Error::message("nested must be a SubRecord"))?;
            }
            other => return Err(Error::message(format!("unknown field `{}`", other))),
        }
        Ok(())
    }
}

#[test]
fn save_and_reload_through_file() {
    let registry = registry();
    let original = Tester {
        int_field: 7,
        list_field: vec![1.5, 2.5],
        nested: SubRecord { name: "x".into() },
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simpleTest.txt");
    save(&original, &path, false, &registry).unwrap();

    let record = load(&path).unwrap();
    assert_eq!(record.type_tag, "Tester");

    let mut restored = Tester::default();
    restored.load_save_data(&record, &registry, &mut ()).unwrap();
    assert_eq!(restored.int_field, 7);
    assert_eq!(restored.list_field, vec![1.5, 2.5]);
    assert_eq!(restored.nested.name, "x");
}

#[test]
fn load_missing_file_propagates_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err.kind(), savetree::ErrorKind::Io(_)));
}

#[test]
fn wrapper_saves_bare_values_through_file() {
    let registry = TypeRegistry::new();
    let wrapper = SaveableWrapper::new(Value::List(vec![
        Value::Int(1),
        Value::from("two"),
        Value::Bool(true),
    ]));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrapper.txt");
    save(&wrapper, &path, true, &registry).unwrap();

    let mut restored = SaveableWrapper::default();
    restored
        .load_save_data(&load(&path).unwrap(), &registry, &mut ())
        .unwrap();
    assert_eq!(restored, wrapper);
}

// A participant that stores live references as ids and resolves them back
// through the load context.
struct World {
    enemy_names: Vec<String>,
}

#[derive(Default)]
struct Turret {
    target: Option<String>,
    kills: i64,
}

impl Saveable for Turret {
    fn type_tag(&self) -> &str {
        "Turret"
    }

    fn save_data(&self, _for_level_save: bool, registry: &TypeRegistry) -> Result<SaveEntry, Error> {
        let mut record = SaveEntry::new(self.type_tag());
        record.add_assign("kills", self.kills, registry)?;
        record.add_invoke("set_target", 1i64, registry)?;
        Ok(record)
    }
}

impl Loadable<World> for Turret {
    fn assign(&mut self, field: &str, value: Value, _ctx: &mut World) -> Result<(), Error> {
        match field {
            "kills" => {
                self.kills = value.as_int().unwrap_or_default();
                Ok(())
            }
            other => Err(Error::message(format!("unknown field `{}`", other))),
        }
    }

    fn invoke(&mut self, method: &str, value: Value, ctx: &mut World) -> Result<(), Error> {
        match method {
            "set_target" => {
                let idx = value
                    .as_int()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| Error::message("target id must be a non-negative int"))?;
                self.target = ctx.enemy_names.get(idx).cloned();
                Ok(())
            }
            other => Err(Error::message(format!("no method handler for `{}`", other))),
        }
    }
}

#[test]
fn invoke_directive_resolves_through_context() {
    let registry = TypeRegistry::new();
    let record = Turret {
        target: None,
        kills: 12,
    }
    .save_data(false, &registry)
    .unwrap();

    let mut world = World {
        enemy_names: vec!["goblin".into(), "ogre".into()],
    };
    let mut turret = Turret::default();
    turret
        .load_save_data(&record, &registry, &mut world)
        .unwrap();
    assert_eq!(turret.kills, 12);
    assert_eq!(turret.target.as_deref(), Some("ogre"));
}

// A participant that intercepts one directive before falling back to the
// default apply behavior: its "loadout" child is a full nested record that
// must not be auto-decoded.
#[derive(Debug, Default, PartialEq)]
struct Mech {
    callsign: String,
    loadout_tag: String,
}

impl Loadable for Mech {
    fn load_save_data(
        &mut self,
        data: &SaveEntry,
        registry: &TypeRegistry,
        ctx: &mut (),
    ) -> Result<(), Error> {
        let mut rest = SaveEntry::new(data.type_tag.clone());
        for item in &data.items {
            match item {
                SaveItem::Entry(child)
                    if child.directive.as_ref().map(|d| d.name()) == Some("loadout") =>
                {
                    // keep the raw record; a real game would construct the
                    // right subtype and hand the child to it
                    self.loadout_tag = child.type_tag.clone();
                }
                other => rest.items.push(other.clone()),
            }
        }
        apply(self, &rest, registry, ctx)
    }

    fn assign(&mut self, field: &str, value: Value, _ctx: &mut ()) -> Result<(), Error> {
        match field {
            "callsign" => {
                self.callsign = value.as_str().unwrap_or_default().to_string();
                Ok(())
            }
            other => Err(Error::message(format!("unknown field `{}`", other))),
        }
    }
}

#[test]
fn override_intercepts_directive_and_delegates_rest() {
    let registry = TypeRegistry::new();
    let mut record = SaveEntry::new("Mech");
    record.add_assign("callsign", "Rook", &registry).unwrap();

    let mut loadout = SaveEntry::new("Loadout");
    loadout.directive = Some(savetree::Directive::assign("loadout"));
    record.items.push(SaveItem::Entry(loadout));

    let mut mech = Mech::default();
    mech.load_save_data(&record, &registry, &mut ()).unwrap();
    assert_eq!(mech.callsign, "Rook");
    // the "Loadout" tag is unknown to the engine; interception kept the
    // default path from failing on it
    assert_eq!(mech.loadout_tag, "Loadout");
}
