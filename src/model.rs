//! Entity-relationship model produced by the parsers.
//!
//! A [`ModelBuilder`] is owned by a single parse call. Every `add_*` method
//! canonicalizes and validates its input against the backend's
//! [`DatabaseTypes`] before the entity is stored, and nothing stored is ever
//! changed afterwards. [`ModelBuilder::finish`] hands the caller a read-only
//! [`Model`].

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::db::{DatabaseType, DatabaseTypes};
use crate::parser::ParseError;
use crate::parser::helper::{lower_first, upper_first};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub id: String,
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub class_id: String,
    pub name: String,
    /// Id of a [`Type`] or [`Enum`].
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub kind: ValidationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationKind {
    Required,
    Unique,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    MinBytes,
    MaxBytes,
}

impl ValidationKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "required" => Some(Self::Required),
            "unique" => Some(Self::Unique),
            "minlength" => Some(Self::MinLength),
            "maxlength" => Some(Self::MaxLength),
            "pattern" => Some(Self::Pattern),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "minbytes" => Some(Self::MinBytes),
            "maxbytes" => Some(Self::MaxBytes),
            _ => None,
        }
    }

    /// Whether the rule needs a value (`maxlength = 20`) to mean anything.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Required | Self::Unique)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// Cardinality of an association whose `from` end is read as end 0 and
    /// `to` end as end 1.
    pub fn between(from: Multiplicity, to: Multiplicity) -> Self {
        match (from.is_many(), to.is_many()) {
            (true, true) => Self::ManyToMany,
            (true, false) => Self::ManyToOne,
            (false, true) => Self::OneToMany,
            (false, false) => Self::OneToOne,
        }
    }
}

/// Bounds of one association end. `upper == None` is unbounded (`*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    pub fn is_many(&self) -> bool {
        self.upper.is_none()
    }

    pub fn is_required(&self) -> bool {
        self.lower != 0
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self {
            lower: 0,
            upper: Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub id: String,
    pub from: String,
    pub to: String,
    pub injected_field_in_from: String,
    pub injected_field_in_to: String,
    pub cardinality: Cardinality,
    pub is_injected_field_in_from_required: bool,
    pub is_injected_field_in_to_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_in_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_in_to: Option<String>,
}

/// Insertion-ordered entities addressable by source id.
#[derive(Debug, Clone, PartialEq)]
struct Table<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn insert(&mut self, id: &str, item: T) -> Result<&T, ParseError> {
        if self.index.contains_key(id) {
            return Err(ParseError::UnsupportedFormat(format!(
                "duplicate element id '{}'",
                id
            )));
        }
        let pos = self.items.len();
        self.index.insert(id.to_string(), pos);
        self.items.push(item);
        Ok(&self.items[pos])
    }
}

impl<T: Serialize> Serialize for Table<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// The finished, read-only model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    database_type: DatabaseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_class_id: Option<String>,
    types: Table<Type>,
    enums: Table<Enum>,
    classes: Table<Class>,
    fields: Table<Field>,
    associations: Table<Association>,
}

impl Model {
    fn empty(database_type: DatabaseType) -> Self {
        Self {
            database_type,
            user_class_id: None,
            types: Table::default(),
            enums: Table::default(),
            classes: Table::default(),
            fields: Table::default(),
            associations: Table::default(),
        }
    }

    pub fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    /// Id of the class named `user`, wired to authentication downstream.
    pub fn user_class_id(&self) -> Option<&str> {
        self.user_class_id.as_deref()
    }

    pub fn types(&self) -> &[Type] {
        &self.types.items
    }

    pub fn type_by_id(&self, id: &str) -> Option<&Type> {
        self.types.get(id)
    }

    pub fn enums(&self) -> &[Enum] {
        &self.enums.items
    }

    pub fn enum_by_id(&self, id: &str) -> Option<&Enum> {
        self.enums.get(id)
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes.items
    }

    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.get(id)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&Class> {
        self.classes.items.iter().find(|c| c.name == name)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields.items
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn fields_of<'a>(&'a self, class_id: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.items.iter().filter(move |f| f.class_id == class_id)
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations.items
    }

    pub fn association(&self, id: &str) -> Option<&Association> {
        self.associations.get(id)
    }
}

/// Append-only accumulator for one parse call.
#[derive(Debug)]
pub struct ModelBuilder {
    db: &'static DatabaseTypes,
    model: Model,
}

impl ModelBuilder {
    pub fn new(db: &'static DatabaseTypes) -> Self {
        Self {
            db,
            model: Model::empty(db.database()),
        }
    }

    pub fn db(&self) -> &'static DatabaseTypes {
        self.db
    }

    /// Read view of everything added so far.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn add_type(&mut self, id: &str, name: &str) -> Result<&Type, ParseError> {
        let canonical = self
            .db
            .canonical_type(name)
            .ok_or_else(|| ParseError::WrongType(upper_first(name.trim())))?;
        log::debug!("type {} -> {}", id, canonical);
        self.model.types.insert(
            id,
            Type {
                id: id.to_string(),
                name: canonical.to_string(),
            },
        )
    }

    pub fn add_enum(&mut self, id: &str, name: &str, values: &[&str]) -> Result<&Enum, ParseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParseError::NullPointer(format!("enumeration '{}' has no name", id)));
        }
        let mut literals = Vec::with_capacity(values.len());
        for value in values {
            let value = value.trim();
            if value.is_empty() {
                return Err(ParseError::NullPointer(format!(
                    "a literal of enumeration '{}' has no name",
                    name
                )));
            }
            literals.push(value.to_uppercase());
        }
        self.model.enums.insert(
            id,
            Enum {
                id: id.to_string(),
                name: upper_first(name),
                values: literals,
            },
        )
    }

    pub fn add_class(&mut self, class: Class) -> Result<&Class, ParseError> {
        if self.db.is_reserved_class_name(&class.name) {
            return Err(ParseError::ReservedName(class.name));
        }
        if self.db.is_reserved_table_name(&class.table_name) {
            return Err(ParseError::ReservedName(class.table_name));
        }
        if self.model.user_class_id.is_none() && class.name.eq_ignore_ascii_case("user") {
            log::debug!("class {} is the user entity", class.id);
            self.model.user_class_id = Some(class.id.clone());
        }
        let id = class.id.clone();
        self.model.classes.insert(&id, class)
    }

    pub fn add_field(&mut self, mut field: Field) -> Result<&Field, ParseError> {
        if !self.model.classes.contains(&field.class_id) {
            return Err(ParseError::UnsupportedFormat(format!(
                "attribute '{}' belongs to unknown class '{}'",
                field.name, field.class_id
            )));
        }
        field.name = lower_first(field.name.trim());
        if field.name.is_empty() {
            return Err(ParseError::NullPointer(format!(
                "an attribute of class '{}' has no name",
                field.class_id
            )));
        }
        if self.db.is_reserved_field_name(&field.name) {
            return Err(ParseError::ReservedName(field.name));
        }
        let id = field.id.clone();
        self.model.fields.insert(&id, field)
    }

    pub fn add_association(&mut self, association: Association) -> Result<&Association, ParseError> {
        for class_id in [&association.from, &association.to] {
            if !self.model.classes.contains(class_id) {
                return Err(ParseError::UnsupportedFormat(format!(
                    "association '{}' references unknown class '{}'",
                    association.id, class_id
                )));
            }
        }
        let id = association.id.clone();
        self.model.associations.insert(&id, association)
    }

    pub fn finish(self) -> Model {
        self.model
    }
}
