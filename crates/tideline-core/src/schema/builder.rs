use super::{
    Association, Attribute, AttributeDef, AttributeTy, BelongsTo, HasMany, Model, ModelDef,
    ModelKind, Schema, Type,
};
use crate::{bail, Result, Transformer};

use indexmap::IndexMap;

/// Turns model definitions into a [`Schema`].
///
/// Definitions are trusted input: anything contradictory is reported as a
/// consistency error and the build fails.
#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,

    models: Vec<ModelDef>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    builder: &'a Builder,

    /// Definitions by identity, so associations can look at both ends.
    defs: IndexMap<&'a str, &'a ModelDef>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn register(&mut self, def: ModelDef) -> &mut Self {
        self.models.push(def);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut defs = IndexMap::new();

        for def in &self.models {
            if def.identity.is_empty() {
                bail!("model identity must not be empty");
            }

            if defs.insert(&def.identity[..], def).is_some() {
                bail!("model `{}` is registered more than once", def.identity);
            }
        }

        let cx = BuildSchema {
            builder: self,
            defs,
        };

        let mut models = IndexMap::new();

        for def in cx.defs.values() {
            let model = cx.build_model(def)?;
            models.insert(model.identity.clone(), model);
        }

        Ok(Schema { models })
    }
}

impl<'a> BuildSchema<'a> {
    fn build_model(&self, def: &ModelDef) -> Result<Model> {
        let primary_key = primary_key_name(def)?;

        let mut attributes = IndexMap::new();

        for (name, attr_def) in &def.attributes {
            let ty = match (&attr_def.model, &attr_def.collection) {
                (Some(_), Some(_)) => bail!(
                    "attribute `{}.{name}` declares both `model` and `collection`",
                    def.identity
                ),
                (Some(target), None) => AttributeTy::BelongsTo(BelongsTo {
                    target: target.clone(),
                    on: self.primary_key_column(target)?,
                }),
                (None, Some(_)) => AttributeTy::HasMany(self.build_has_many(def, name, attr_def)?),
                (None, None) => AttributeTy::Primitive(attr_def.ty.unwrap_or(Type::Json)),
            };

            let column_name = match ty {
                AttributeTy::HasMany(_) => None,
                _ => Some(attr_def.column_name.clone().unwrap_or_else(|| name.clone())),
            };

            attributes.insert(
                name.clone(),
                Attribute {
                    name: name.clone(),
                    column_name,
                    primary_key: *name == primary_key,
                    ty,
                },
            );
        }

        match attributes.get(&primary_key) {
            Some(attr) if attr.is_association() => bail!(
                "primary key `{}.{primary_key}` must not be an association",
                def.identity
            ),
            Some(_) => {}
            None => bail!(
                "primary key `{primary_key}` is not an attribute of `{}`",
                def.identity
            ),
        }

        let kind = if def.junction_table {
            ModelKind::Junction
        } else if !def.through_table.is_empty() {
            ModelKind::Through(def.through_table.clone())
        } else {
            ModelKind::Standard
        };

        let table_name = def.table_name.clone().unwrap_or_else(|| def.identity.clone());
        let table_name = match &self.builder.table_name_prefix {
            Some(prefix) => format!("{prefix}{table_name}"),
            None => table_name,
        };

        let transformer = Transformer::from_attributes(attributes.values());

        Ok(Model {
            identity: def.identity.clone(),
            table_name,
            datastore: def.datastore.clone(),
            primary_key,
            attributes,
            kind,
            transformer,
        })
    }

    fn build_has_many(&self, def: &ModelDef, name: &str, attr_def: &AttributeDef) -> Result<HasMany> {
        let Some(target) = &attr_def.collection else {
            bail!("attribute `{}.{name}` is not a collection", def.identity);
        };

        self.def(target)?;

        let reference_identity = attr_def
            .reference_identity
            .clone()
            .unwrap_or_else(|| target.clone());
        let reference = self.def(&reference_identity)?;

        let many_to_many = reference_identity != *target
            || reference.junction_table
            || !reference.through_table.is_empty();

        if !many_to_many {
            let Some(via) = &attr_def.via else {
                bail!(
                    "one-to-many association `{}.{name}` must declare `via`",
                    def.identity
                );
            };

            match reference.attributes.get(via) {
                Some(via_def) if via_def.model.as_deref() == Some(&def.identity[..]) => {}
                Some(_) => bail!(
                    "`{}.{via}` must be a singular association back to `{}`",
                    reference.identity,
                    def.identity
                ),
                None => bail!(
                    "`{}.{name}` is via `{via}` but `{}` has no such attribute",
                    def.identity,
                    reference.identity
                ),
            }

            let on = match &attr_def.on {
                Some(on) => on.clone(),
                None => column_of(reference, via)?,
            };

            return Ok(HasMany {
                target: target.clone(),
                via: Some(via.clone()),
                reference_identity,
                on,
                association: Association::OneToMany { via: via.clone() },
            });
        }

        let (association, parent_reference) = if reference.junction_table {
            let (parent_reference, child_reference) =
                junction_references(def, reference, attr_def.on.as_deref())?;

            (
                Association::ManyToManyViaJunction {
                    junction: reference_identity.clone(),
                    parent_reference: parent_reference.clone(),
                    child_reference,
                },
                parent_reference,
            )
        } else if !reference.through_table.is_empty() {
            let (parent_reference, child_reference) =
                through_references(def, name, reference, attr_def.on.as_deref())?;

            (
                Association::ManyToManyViaThrough {
                    through: reference_identity.clone(),
                    parent_reference: parent_reference.clone(),
                    child_reference,
                },
                parent_reference,
            )
        } else {
            bail!(
                "`{}.{name}` references `{reference_identity}`, which is neither a junction nor a through model",
                def.identity
            );
        };

        let on = match &attr_def.on {
            Some(on) => on.clone(),
            None => column_of(reference, &parent_reference)?,
        };

        Ok(HasMany {
            target: target.clone(),
            via: attr_def.via.clone(),
            reference_identity,
            on,
            association,
        })
    }

    fn def(&self, identity: &str) -> Result<&'a ModelDef> {
        match self.defs.get(identity) {
            Some(def) => Ok(*def),
            None => bail!("no model with identity `{identity}`"),
        }
    }

    fn primary_key_column(&self, identity: &str) -> Result<String> {
        let def = self.def(identity)?;
        column_of(def, &primary_key_name(def)?)
    }
}

fn primary_key_name(def: &ModelDef) -> Result<String> {
    if let Some(primary_key) = &def.primary_key {
        return Ok(primary_key.clone());
    }

    let flagged = def
        .attributes
        .iter()
        .find(|(_, attr)| attr.primary_key)
        .map(|(name, _)| name.clone());

    match flagged {
        Some(name) => Ok(name),
        None if def.attributes.contains_key("id") => Ok("id".to_string()),
        None => bail!("model `{}` has no primary key", def.identity),
    }
}

fn column_of(def: &ModelDef, attr_name: &str) -> Result<String> {
    match def.attributes.get(attr_name) {
        Some(attr) if attr.collection.is_some() => {
            bail!("`{}.{attr_name}` is a collection and has no column", def.identity)
        }
        Some(attr) => Ok(attr.column_name.clone().unwrap_or_else(|| attr_name.to_string())),
        None => bail!("model `{}` has no attribute `{attr_name}`", def.identity),
    }
}

/// Singular associations declared on a link model.
fn link_attributes(link: &ModelDef) -> impl Iterator<Item = (&String, &AttributeDef)> {
    link.attributes.iter().filter(|(_, attr)| attr.model.is_some())
}

/// The junction attribute whose column equals `on` points at the parent; the
/// other singular attribute points at the child.
fn junction_references(
    parent: &ModelDef,
    junction: &ModelDef,
    on: Option<&str>,
) -> Result<(String, String)> {
    let parent_reference = link_attributes(junction)
        .find(|(name, attr)| match on {
            Some(on) => attr.column_name.as_deref().unwrap_or(name) == on,
            None => attr.model.as_deref() == Some(&parent.identity[..]),
        })
        .map(|(name, _)| name.clone());

    let Some(parent_reference) = parent_reference else {
        bail!(
            "junction `{}` has no attribute referencing `{}`",
            junction.identity,
            parent.identity
        );
    };

    let child_reference = link_attributes(junction)
        .find(|(name, _)| **name != parent_reference)
        .map(|(name, _)| name.clone());

    match child_reference {
        Some(child_reference) => Ok((parent_reference, child_reference)),
        None => bail!(
            "junction `{}` has no attribute referencing the child side",
            junction.identity
        ),
    }
}

/// The through map names the child side under `"<model>.<association>"`.
/// The parent side is the other mapped attribute, or failing that the
/// singular attribute whose column equals `on`.
fn through_references(
    parent: &ModelDef,
    name: &str,
    through: &ModelDef,
    on: Option<&str>,
) -> Result<(String, String)> {
    let key = format!("{}.{name}", parent.identity);

    let Some(child_reference) = through.through_table.get(&key) else {
        bail!("through model `{}` has no entry for `{key}`", through.identity);
    };

    let from_map = through
        .through_table
        .iter()
        .find(|(other, attr_name)| **other != key && *attr_name != child_reference)
        .map(|(_, attr_name)| attr_name.clone());

    let parent_reference = from_map.or_else(|| {
        link_attributes(through)
            .find(|(attr_name, attr)| {
                *attr_name != child_reference
                    && match on {
                        Some(on) => attr.column_name.as_deref().unwrap_or(attr_name) == on,
                        None => attr.model.as_deref() == Some(&parent.identity[..]),
                    }
            })
            .map(|(attr_name, _)| attr_name.clone())
    });

    match parent_reference {
        Some(parent_reference) => Ok((parent_reference, child_reference.clone())),
        None => bail!(
            "through model `{}` has no attribute referencing `{}`",
            through.identity,
            parent.identity
        ),
    }
}
