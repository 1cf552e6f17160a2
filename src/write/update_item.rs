use crate::{
    Result, common,
    common::{
        fields,
        options::{ExpressionKind, RequestOptions},
    },
    store::{Store, UpdateRequest, WriteOutput},
};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::to_attribute_value;
use std::{collections, fmt};

/// Separator between the terms of one clause.
const TERM_SEPARATOR: &str = ", ";

/// What an update does to a single field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldUpdate {
    /// Assign the value, `SET #f = :f`.
    Set(types::AttributeValue),
    /// Delete the attribute, `REMOVE #f`.
    Remove,
    /// Increment a number or append to a set, `ADD #f :f`.
    Add(types::AttributeValue),
}

impl FieldUpdate {
    /// Classify a raw field.
    ///
    /// A `NULL` value removes the field, whatever its name; otherwise a `+`
    /// prefix marks an addition. The returned name never carries the prefix.
    pub fn classify(field: &str, value: types::AttributeValue) -> (String, Self) {
        let (name, is_increment) = fields::strip_prefix(field);
        let update = if fields::is_deletion(&value) {
            Self::Remove
        } else if is_increment {
            Self::Add(value)
        } else {
            Self::Set(value)
        };
        (name.to_string(), update)
    }
}

/// Fields of an update split into the disjoint SET, REMOVE and ADD groups.
///
/// Each group keeps the order of the field map it was built from.
///
/// ```rust
/// use dynamodb_expr::{common::fields, write::update_item};
/// use serde_json::{Value, json};
///
/// let fields = fields::FieldMap::from([
///     ("name".to_string(), json!("Jane")),
///     ("nickname".to_string(), Value::Null),
///     ("+visits".to_string(), json!(1)),
/// ]);
/// let groups = update_item::UpdateGroups::try_from(&fields).unwrap();
/// assert_eq!(
///     groups.to_string(),
///     "SET #name = :name REMOVE #nickname ADD #visits :visits"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateGroups {
    /// Fields to add to.
    pub add: Vec<(String, types::AttributeValue)>,
    /// Fields to delete.
    pub remove: Vec<String>,
    /// Fields to assign.
    pub set: Vec<(String, types::AttributeValue)>,
}

impl UpdateGroups {
    fn push(&mut self, name: String, update: FieldUpdate) {
        match update {
            FieldUpdate::Set(value) => self.set.push((name, value)),
            FieldUpdate::Remove => self.remove.push(name),
            FieldUpdate::Add(value) => self.add.push((name, value)),
        }
    }

    /// Whether no field is updated.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty() && self.add.is_empty()
    }
}

impl<T: Serialize> TryFrom<&fields::FieldMap<T>> for UpdateGroups {
    type Error = crate::Error;

    fn try_from(field_map: &fields::FieldMap<T>) -> Result<Self> {
        let mut groups = Self::default();
        for (field, value) in field_map {
            let value = to_attribute_value(value)?;
            let (name, update) = FieldUpdate::classify(field, value);
            groups.push(name, update);
        }
        Ok(groups)
    }
}

fn write_clause<I>(f: &mut fmt::Formatter<'_>, keyword: &str, terms: I) -> fmt::Result
where
    I: IntoIterator<Item = String>,
{
    let terms: Vec<_> = terms.into_iter().collect();
    if terms.is_empty() {
        return Ok(());
    }
    write!(f, "{keyword} {}", terms.join(TERM_SEPARATOR))
}

impl fmt::Display for UpdateGroups {
    /// Emits `SET ..`, then `REMOVE ..`, then `ADD ..`, skipping empty groups.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.set.iter().map(|(name, _)| {
            let placeholder = common::name_placeholder(name);
            let value = common::value_placeholder(name);
            format!("{placeholder} = {value}")
        });
        let remove = self.remove.iter().map(|name| common::name_placeholder(name));
        let add = self.add.iter().map(|(name, _)| {
            let placeholder = common::name_placeholder(name);
            let value = common::value_placeholder(name);
            format!("{placeholder} {value}")
        });
        let clauses = [
            ("SET", set.collect::<Vec<_>>()),
            ("REMOVE", remove.collect()),
            ("ADD", add.collect()),
        ];
        let mut is_first = true;
        for (keyword, terms) in clauses {
            if terms.is_empty() {
                continue;
            }
            if !is_first {
                f.write_str(" ")?;
            }
            write_clause(f, keyword, terms)?;
            is_first = false;
        }
        Ok(())
    }
}

impl From<UpdateGroups> for common::ExpressionBundle {
    fn from(groups: UpdateGroups) -> Self {
        let expression = groups.to_string();
        let mut expression_attribute_names = collections::HashMap::new();
        let mut expression_attribute_values = collections::HashMap::new();
        for name in &groups.remove {
            expression_attribute_names.insert(common::name_placeholder(name), name.clone());
        }
        for (name, value) in groups.set.into_iter().chain(groups.add) {
            expression_attribute_names.insert(common::name_placeholder(&name), name.clone());
            expression_attribute_values.insert(common::value_placeholder(&name), value);
        }
        Self {
            expression,
            expression_attribute_names,
            expression_attribute_values,
        }
    }
}

/// Build the update expression for a field map.
///
/// `NULL` values land in REMOVE, `+` prefixed names in ADD and everything else
/// in SET. Pair it with [`fields::build_name_placeholders`] and
/// [`fields::build_value_placeholders`], leaving removed fields out of the values,
/// or use [`UpdateItem`] which does both.
pub fn build_update_clause<T: Serialize>(field_map: &fields::FieldMap<T>) -> Result<String> {
    let groups = UpdateGroups::try_from(field_map)?;
    Ok(groups.to_string())
}

/// Update item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_expr::{common, write};
/// use serde_json::{Value, json};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item = write::update_item::UpdateItem {
///     fields: common::fields::FieldMap::from([
///         ("name".to_string(), json!("Jane")),
///         ("+age".to_string(), json!(1)),
///         ("nickname".to_string(), Value::Null),
///     ]),
///     keys: common::key::Keys {
///         partition_key: common::key::Key {
///             name: "id".to_string(),
///             value: json!("1"),
///         },
///         ..Default::default()
///     },
///     table_name: "users".to_string(),
///     ..Default::default()
/// };
/// // SET #name = :name REMOVE #nickname ADD #age :age
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItem<T> {
    /// Fields to change; see [`build_update_clause`].
    pub fields: fields::FieldMap<T>,
    /// The primary key of the item to update.
    pub keys: common::key::Keys<T>,
    /// Raw options merged after the generated ones (condition, return values, ...).
    pub options: Option<RequestOptions>,
    /// The table holding the item.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<UpdateItem<T>> for UpdateRequest {
    type Error = crate::Error;

    fn try_from(update_item: UpdateItem<T>) -> Result<Self> {
        let key = update_item.keys.try_into()?;
        let groups = UpdateGroups::try_from(&update_item.fields)?;
        let raw = update_item.options.unwrap_or_default();
        let options = if groups.is_empty() {
            raw
        } else {
            RequestOptions::from_bundle(ExpressionKind::Update, groups.into()).merge(raw)
        };
        let request = Self {
            key,
            options,
            table_name: update_item.table_name,
        };
        Ok(request)
    }
}

impl<T: Serialize> UpdateItem<T> {
    /// Build the request as an element of a transactional write instead of executing it.
    pub fn into_transact_item(self) -> Result<types::TransactWriteItem> {
        let request: UpdateRequest = self.try_into()?;
        let options = request.options;
        let update = types::Update::builder()
            .table_name(request.table_name)
            .set_key(Some(request.key))
            .set_update_expression(options.update_expression)
            .set_condition_expression(options.condition_expression)
            .set_expression_attribute_names(options.expression_attribute_names)
            .set_expression_attribute_values(options.expression_attribute_values)
            .build()?;
        Ok(types::TransactWriteItem::builder().update(update).build())
    }

    /// Execute the update item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_expr.update_item",
            skip_all,
            fields(table_name = %self.table_name),
            err
        )
    )]
    pub async fn send<S: Store>(self, store: &S) -> Result<WriteOutput> {
        let request: UpdateRequest = self.try_into()?;
        store.update(&request).await
    }
}
