use fixtree_core::{
    AssociationKind, CoreError, ModelDef, NodeOptions, Record, RecordSet, TemplateNode, Value,
};
use fixtree_loader::render_with_record;
use fixtree_query::{SelectFilter, Through, build_select, build_select_by, build_select_through};
use tracing::debug;

use crate::error::FixtureError;
use crate::fixtures::Fixtures;

/// The row whose associations a nested template node walks.
#[derive(Debug, Clone, Copy)]
pub struct Parent<'a> {
    pub model: &'a ModelDef,
    pub record: &'a Record,
}

/// Walk `nodes` and collect every visited row into `records`.
///
/// Without a parent each node names a model and selects from its table; with
/// a parent each node names an association of the parent's model. Nodes are
/// walked in declaration order, depth first, and each row is collected
/// before its own children are walked. Templates that loop back onto an
/// association already walked are followed without limit.
pub fn parse_template(
    fixtures: &Fixtures,
    parent: Option<Parent<'_>>,
    nodes: &[TemplateNode],
    records: &mut RecordSet,
) -> Result<(), FixtureError> {
    for node in nodes {
        let (name, options) = node.parts()?;
        let (model, rows) = match parent {
            None => root_rows(fixtures, name, options)?,
            Some(parent) => association_rows(fixtures, parent, name, options)?,
        };
        debug!(node = name, class = %model.name, rows = rows.len(), "walked template node");

        let children = options.map(NodeOptions::children).unwrap_or_default();
        for row in rows {
            records.push(&model.name, sanitize(&row, options)?);
            if !children.is_empty() {
                let parent = Parent {
                    model,
                    record: &row,
                };
                parse_template(fixtures, Some(parent), children, records)?;
            }
        }
    }
    Ok(())
}

/// Apply the in-memory filters of a node: `limit_by`, then `hard_limit`.
pub fn build_relations(
    rows: Vec<Record>,
    options: Option<&NodeOptions>,
) -> Result<Vec<Record>, CoreError> {
    let Some(options) = options else {
        return Ok(rows);
    };

    let mut rows = match &options.limit_by {
        Some(limit_by) => {
            let (column, count) = limit_by.column_and_count()?;
            limit_per_group(rows, column, count)
        }
        None => rows,
    };
    if let Some(hard_limit) = options.hard_limit {
        rows.truncate(hard_limit);
    }
    Ok(rows)
}

/// Keep the first `count` rows for each value of `column`. Groups come out
/// in the order their first row was seen.
fn limit_per_group(rows: Vec<Record>, column: &str, count: usize) -> Vec<Record> {
    let mut groups: Vec<(Value, Vec<Record>)> = Vec::new();
    for row in rows {
        let key = row.get(column).cloned().unwrap_or(Value::Null);
        let idx = match groups.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx].1;
        if group.len() < count {
            group.push(row);
        }
    }
    groups.into_iter().flat_map(|(_, rows)| rows).collect()
}

fn root_rows<'f>(
    fixtures: &'f Fixtures,
    name: &str,
    options: Option<&NodeOptions>,
) -> Result<(&'f ModelDef, Vec<Record>), FixtureError> {
    let model = fixtures.models().resolve(name)?;
    let filter = SelectFilter::from_options(options)?;
    let rows = fixtures
        .db()
        .query(&build_select(&model.table_name(), &filter))?;
    Ok((model, build_relations(rows, options)?))
}

fn association_rows<'f>(
    fixtures: &'f Fixtures,
    parent: Parent<'_>,
    name: &str,
    options: Option<&NodeOptions>,
) -> Result<(&'f ModelDef, Vec<Record>), FixtureError> {
    let owner = parent.model;
    let assoc = owner.association(name).ok_or_else(|| {
        CoreError::AssociationNotFound(owner.name.clone(), name.to_string())
    })?;
    let target = fixtures.models().target_of(owner, assoc)?;
    let table = target.table_name();
    let db = fixtures.db();

    if assoc.kind == AssociationKind::BelongsTo {
        let rows = match present(parent.record, &assoc.foreign_key_for(owner)) {
            Some(fk) => db.query(&build_select_by(
                &table,
                &target.primary_key,
                fk,
                &SelectFilter::new().with_limit(1),
            ))?,
            None => Vec::new(),
        };
        return Ok((target, rows));
    }

    let Some(owner_id) = present(parent.record, &owner.primary_key) else {
        return Ok((target, Vec::new()));
    };
    let foreign_key = assoc.foreign_key_for(owner);
    // Singular associations fetch one row and ignore the node's filters.
    let filter = if assoc.kind.is_collection() {
        SelectFilter::from_options(options)?
    } else {
        SelectFilter::new().with_limit(1)
    };
    let rows = if assoc.kind == AssociationKind::HasAndBelongsToMany {
        let join_table = assoc.join_table_for(owner, target);
        let target_key = assoc.association_foreign_key_for();
        let through = Through {
            join_table: &join_table,
            owner_key: &foreign_key,
            target_key: &target_key,
        };
        db.query(&build_select_through(
            &table,
            &target.primary_key,
            &through,
            owner_id,
            &filter,
        ))?
    } else {
        db.query(&build_select_by(&table, &foreign_key, owner_id, &filter))?
    };
    let rows = if assoc.kind.is_collection() {
        build_relations(rows, options)?
    } else {
        rows
    };
    Ok((target, rows))
}

fn present<'r>(record: &'r Record, column: &str) -> Option<&'r Value> {
    record.get(column).filter(|value| !value.is_null())
}

/// Copy of `row` with each sanitized column replaced by its rendered template.
fn sanitize(row: &Record, options: Option<&NodeOptions>) -> Result<Record, FixtureError> {
    let mut sanitized = row.clone();
    if let Some(templates) = options.and_then(|o| o.sanitize.as_ref()) {
        for (column, template) in templates {
            let rendered = render_with_record(template, row)?;
            sanitized.insert(column.clone(), Value::Text(rendered));
        }
    }
    Ok(sanitized)
}
