use super::push_unique;

use tideline_core::query::{Criteria, Join, PhysicalCriteria};
use tideline_core::schema::{Association, AttributeTy, Model};
use tideline_core::{bail, Result, Schema};

/// Build the join descriptors for one populate.
///
/// Direct associations produce one join. Associations through a junction or
/// through model produce two: parent to mediator, then mediator to child.
pub(super) fn build(
    schema: &Schema,
    parent: &Model,
    alias: String,
    subcriteria: Criteria,
) -> Result<Vec<Join>> {
    let Some(attr) = parent.attribute(&alias) else {
        bail!("`{}` has no association `{alias}`", parent.identity);
    };

    let has_many = match &attr.ty {
        AttributeTy::Primitive(_) => bail!("`{}.{alias}` is not an association", parent.identity),
        AttributeTy::BelongsTo(belongs_to) => {
            let child = schema.model(&belongs_to.target)?;

            return Ok(vec![Join {
                parent_identity: parent.identity.clone(),
                parent: parent.table_name.clone(),
                parent_key: attr.column()?.to_string(),
                child_identity: child.identity.clone(),
                child: child.table_name.clone(),
                child_key: belongs_to.on.clone(),
                alias,
                select: true,
                criteria: Some(child_criteria(child, subcriteria, None)),
                collection: false,
                model: true,
                junction_table: false,
                remove_parent_key: true,
            }]);
        }
        AttributeTy::HasMany(has_many) => has_many,
    };

    let child = schema.model(&has_many.target)?;
    let parent_key = parent.primary_key_column()?.to_string();

    if let Association::OneToMany { via } = &has_many.association {
        return Ok(vec![Join {
            parent_identity: parent.identity.clone(),
            parent: parent.table_name.clone(),
            parent_key,
            child_identity: child.identity.clone(),
            child: child.table_name.clone(),
            child_key: has_many.on.clone(),
            alias,
            select: true,
            criteria: Some(child_criteria(child, subcriteria, Some(via))),
            collection: true,
            model: false,
            junction_table: false,
            remove_parent_key: false,
        }]);
    }

    let Some((_, child_reference)) = has_many.association.references() else {
        bail!("`{}.{alias}` has no mediator references", parent.identity);
    };

    let mediator = schema.model(&has_many.reference_identity)?;

    let Some(reference) = mediator.attribute(child_reference) else {
        bail!("`{}` has no attribute `{child_reference}`", mediator.identity);
    };

    let Some(reference_target) = reference.as_belongs_to() else {
        bail!(
            "`{}.{child_reference}` must be a singular association",
            mediator.identity
        );
    };

    let to_mediator = Join {
        parent_identity: parent.identity.clone(),
        parent: parent.table_name.clone(),
        parent_key,
        child_identity: mediator.identity.clone(),
        child: mediator.table_name.clone(),
        child_key: has_many.on.clone(),
        alias: alias.clone(),
        select: false,
        criteria: None,
        collection: true,
        model: false,
        junction_table: true,
        remove_parent_key: false,
    };

    let to_child = Join {
        parent_identity: mediator.identity.clone(),
        parent: mediator.table_name.clone(),
        parent_key: reference.column()?.to_string(),
        child_identity: child.identity.clone(),
        child: child.table_name.clone(),
        child_key: reference_target.on.clone(),
        alias,
        select: true,
        criteria: Some(child_criteria(child, subcriteria, None)),
        collection: true,
        model: false,
        junction_table: true,
        remove_parent_key: false,
    };

    Ok(vec![to_mediator, to_child])
}

/// Column-named criteria for the child side of a join.
///
/// The child's primary key is always selected so results can be
/// deduplicated, and so is the foreign key of a one-to-many association so
/// children can be grouped under their parent.
fn child_criteria(child: &Model, subcriteria: Criteria, via: Option<&str>) -> PhysicalCriteria {
    let mut select = vec![];

    for attr in child.stored_attributes() {
        if !subcriteria.is_select_all() && !subcriteria.select.contains(&attr.name) {
            continue;
        }

        if subcriteria.omit.contains(&attr.name) {
            continue;
        }

        push_unique(&mut select, &attr.name);
    }

    push_unique(&mut select, &child.primary_key);

    if let Some(via) = via {
        push_unique(&mut select, via);
    }

    let mut criteria = PhysicalCriteria {
        where_clause: subcriteria.where_clause,
        limit: subcriteria.limit,
        skip: subcriteria.skip,
        sort: subcriteria.sort,
        select,
    };
    child.transformer.serialize_criteria(&mut criteria);
    criteria
}
