//! XMI class diagram to ER model conversion.
//!
//! Every supported editor goes through the same five phases, in this order:
//!
//! ```text
//! classify -> types -> enums -> classes & fields -> associations
//! ```
//!
//! Later phases look up what earlier ones added (fields reference types,
//! associations reference classes). Editors only differ in how elements are
//! found and read, which each one describes through [`Format`].

mod detect;
mod genmymodel;
pub mod helper;
mod modelio;
mod visual_paradigm;


use std::collections::HashMap;

use crate::db::DatabaseType;
use crate::document::Element;
use crate::model::{
    Association, Cardinality, Class, Field, Model, ModelBuilder, Multiplicity, Validation,
    ValidationKind,
};
use helper::ClassName;

pub use detect::{Editor, create_parser};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    NullPointer(String),
    #[error("Type '{0}' is not supported by the selected database")]
    WrongType(String),
    #[error("Field '{0}' has no type")]
    WrongField(String),
    #[error("'{0}' is a reserved word for the selected database")]
    ReservedName(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Structural kind of a packaged element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Type,
    Enum,
    Class,
    Association,
    Package,
    Unrecognized,
}

/// Where an attribute's type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeRef<'d> {
    /// Id of a type or enumeration in the same document.
    Inline(&'d str),
    /// Link into a type library, e.g. `...PrimitiveTypes.xmi#String`.
    Href(&'d str),
    Missing,
}

/// Extraction rules of one editor's export format.
pub(crate) trait Format: Sync {
    fn editor(&self) -> Editor;

    /// Whether the document root carries this editor's fingerprint.
    fn recognizes(&self, root: &Element) -> bool;

    /// The element whose `packagedElement` children hold the diagram.
    fn model_root<'d>(&self, root: &'d Element) -> Option<&'d Element>;

    fn classify(&self, element: &Element) -> ElementKind {
        match element.xmi_type() {
            Some("uml:Class") => ElementKind::Class,
            Some("uml:Enumeration") => ElementKind::Enum,
            Some("uml:PrimitiveType") | Some("uml:DataType") => ElementKind::Type,
            Some("uml:Association") => ElementKind::Association,
            Some("uml:Package") => ElementKind::Package,
            _ => ElementKind::Unrecognized,
        }
    }

    fn comment(&self, element: &Element) -> Option<String>;

    fn attribute_type<'d>(&self, attribute: &'d Element) -> TypeRef<'d> {
        if let Some(id) = attribute.non_empty_attr("type") {
            return TypeRef::Inline(id);
        }
        match attribute.child("type").and_then(|t| t.non_empty_attr("href")) {
            Some(href) => TypeRef::Href(href),
            None => TypeRef::Missing,
        }
    }

    /// Owned attributes that are really the navigable end of an association.
    fn is_association_end(&self, attribute: &Element) -> bool {
        attribute.non_empty_attr("association").is_some()
    }

    /// Ends of an association in `memberEnd` order, falling back to its
    /// `ownedEnd` children.
    fn association_ends<'d>(&self, association: &'d Element, scan: &Buckets<'d>) -> Vec<&'d Element> {
        match association.non_empty_attr("memberEnd") {
            Some(member_ends) => member_ends
                .split_whitespace()
                .filter_map(|id| scan.ends.get(id).copied())
                .collect(),
            None => association.children_named("ownedEnd").collect(),
        }
    }

    fn multiplicity(&self, end: &Element) -> Multiplicity {
        helper::read_multiplicity(end)
    }

    /// Constraints on one attribute, authored as `ownedRule`s of its class.
    fn validations(&self, class: &Element, attribute_id: &str) -> Vec<Validation> {
        class
            .children_named("ownedRule")
            .filter(|rule| {
                rule.attr("constrainedElement")
                    .is_some_and(|ids| ids.split_whitespace().any(|id| id == attribute_id))
            })
            .filter_map(read_validation)
            .collect()
    }
}

fn read_validation(rule: &Element) -> Option<Validation> {
    let name = rule.non_empty_attr("name")?;
    let Some(kind) = ValidationKind::from_str(name) else {
        log::warn!("ignoring unknown validation '{}'", name);
        return None;
    };
    let value = rule.child("specification").and_then(|spec| {
        spec.non_empty_attr("value")
            .or_else(|| spec.child("body").and_then(|b| b.text.as_deref()))
            .map(str::to_string)
    });
    if kind.takes_value() && value.is_none() {
        log::warn!("ignoring validation '{}' without a value", name);
        return None;
    }
    Some(Validation { kind, value })
}

/// Elements sorted out by the classify phase. Lives for one parse call.
#[derive(Debug, Default)]
pub(crate) struct Buckets<'d> {
    types: Vec<&'d Element>,
    enums: Vec<&'d Element>,
    classes: Vec<&'d Element>,
    associations: Vec<&'d Element>,
    /// Owned attributes and owned ends by id, for `memberEnd` lookup.
    ends: HashMap<&'d str, &'d Element>,
}

/// Runs the five phases for one document with one editor's [`Format`].
pub struct Parser<'d> {
    format: &'static dyn Format,
    root: &'d Element,
    model: ModelBuilder,
}

impl<'d> Parser<'d> {
    pub fn new(root: &'d Element, editor: Editor, database: DatabaseType) -> Self {
        Self {
            format: editor.format(),
            root,
            model: ModelBuilder::new(database.types()),
        }
    }

    pub fn editor(&self) -> Editor {
        self.format.editor()
    }

    /// Run every phase. The first error discards everything built so far.
    pub fn parse(mut self) -> Result<Model, ParseError> {
        let scan = self.classify()?;
        self.parse_types(&scan)?;
        self.parse_enums(&scan)?;
        self.parse_classes(&scan)?;
        self.parse_associations(&scan)?;

        let model = self.model.finish();
        log::info!(
            "parsed {} export: {} classes, {} fields, {} enums, {} associations",
            self.format.editor().name(),
            model.classes().len(),
            model.fields().len(),
            model.enums().len(),
            model.associations().len()
        );
        Ok(model)
    }

    fn classify(&self) -> Result<Buckets<'d>, ParseError> {
        let container = self.format.model_root(self.root).ok_or_else(|| {
            ParseError::UnsupportedFormat(format!(
                "{} document has no model element",
                self.format.editor().name()
            ))
        })?;
        let mut scan = Buckets::default();
        self.collect(container, &mut scan);
        Ok(scan)
    }

    fn collect(&self, container: &'d Element, scan: &mut Buckets<'d>) {
        for element in container.children_named("packagedElement") {
            match self.format.classify(element) {
                ElementKind::Type => scan.types.push(element),
                ElementKind::Enum => scan.enums.push(element),
                ElementKind::Class => {
                    index_ends(element, "ownedAttribute", scan);
                    scan.classes.push(element);
                }
                ElementKind::Association => {
                    index_ends(element, "ownedEnd", scan);
                    scan.associations.push(element);
                }
                ElementKind::Package => self.collect(element, scan),
                ElementKind::Unrecognized => log::debug!(
                    "skipping {} element {}",
                    element.xmi_type().unwrap_or("untyped"),
                    element.id().unwrap_or("without id")
                ),
            }
        }
    }

    fn parse_types(&mut self, scan: &Buckets<'d>) -> Result<(), ParseError> {
        for &element in &scan.types {
            let id = element_id(element)?;
            let name = element
                .non_empty_attr("name")
                .ok_or_else(|| ParseError::NullPointer(format!("type '{}' has no name", id)))?;
            self.model.add_type(id, name)?;
        }
        Ok(())
    }

    fn parse_enums(&mut self, scan: &Buckets<'d>) -> Result<(), ParseError> {
        for &element in &scan.enums {
            let id = element_id(element)?;
            let literals: Vec<&str> = element
                .children_named("ownedLiteral")
                .map(|literal| literal.attr("name").unwrap_or_default())
                .collect();
            self.model
                .add_enum(id, element.attr("name").unwrap_or_default(), &literals)?;
        }
        Ok(())
    }

    fn parse_classes(&mut self, scan: &Buckets<'d>) -> Result<(), ParseError> {
        for &element in &scan.classes {
            let id = element_id(element)?;
            let label = element
                .non_empty_attr("name")
                .ok_or_else(|| ParseError::NullPointer(format!("class '{}' has no name", id)))?;
            let ClassName {
                entity_name,
                table_name,
            } = helper::split_class_label(label);
            if entity_name.is_empty() {
                return Err(ParseError::NullPointer(format!("class '{}' has no name", id)));
            }

            self.model.add_class(Class {
                id: id.to_string(),
                name: entity_name.clone(),
                table_name,
                comment: self.format.comment(element),
            })?;

            for attribute in element.children_named("ownedAttribute") {
                self.parse_attribute(element, id, &entity_name, attribute)?;
            }
        }
        Ok(())
    }

    fn parse_attribute(
        &mut self,
        class: &Element,
        class_id: &str,
        class_name: &str,
        attribute: &Element,
    ) -> Result<(), ParseError> {
        if self.format.is_association_end(attribute) {
            return Ok(());
        }
        let name = attribute.non_empty_attr("name").ok_or_else(|| {
            ParseError::NullPointer(format!("an attribute of class '{}' has no name", class_name))
        })?;
        if helper::is_an_id(name, class_name) {
            log::debug!("skipping identifier attribute {}.{}", class_name, name);
            return Ok(());
        }
        let id = element_id(attribute)?;

        let type_id = match self.format.attribute_type(attribute) {
            TypeRef::Inline(type_id) => {
                let known = self.model.model();
                if known.type_by_id(type_id).is_none() && known.enum_by_id(type_id).is_none() {
                    log::warn!(
                        "field {}.{} refers to '{}', which is neither a type nor an enumeration",
                        class_name,
                        name,
                        type_id
                    );
                }
                type_id.to_string()
            }
            TypeRef::Href(href) => {
                let type_name = helper::type_name_from_href(href)
                    .ok_or_else(|| ParseError::WrongField(name.to_string()))?;
                self.register_type(type_name)?
            }
            TypeRef::Missing => return Err(ParseError::WrongField(name.to_string())),
        };

        self.model.add_field(Field {
            id: id.to_string(),
            class_id: class_id.to_string(),
            name: name.to_string(),
            type_id,
            comment: self.format.comment(attribute),
            validations: self.format.validations(class, id),
        })?;
        Ok(())
    }

    /// Type named only by a library link; registered under its own name.
    fn register_type(&mut self, type_name: &str) -> Result<String, ParseError> {
        let canonical = self
            .model
            .db()
            .canonical_type(type_name)
            .ok_or_else(|| ParseError::WrongType(helper::upper_first(type_name)))?;
        if self.model.model().type_by_id(canonical).is_none() {
            self.model.add_type(canonical, canonical)?;
        }
        Ok(canonical.to_string())
    }

    fn parse_associations(&mut self, scan: &Buckets<'d>) -> Result<(), ParseError> {
        for &element in &scan.associations {
            let id = element_id(element)?;
            let ends = self.format.association_ends(element, scan);
            let &[end0, end1] = ends.as_slice() else {
                return Err(ParseError::UnsupportedFormat(format!(
                    "association '{}' has {} ends, only binary associations are supported",
                    id,
                    ends.len()
                )));
            };

            let from = end_class(id, end0)?;
            let to = end_class(id, end1)?;
            let from_end = self.format.multiplicity(end0);
            let to_end = self.format.multiplicity(end1);

            let association = Association {
                id: id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                // An end's role name is the field the opposite class gets.
                injected_field_in_from: self.role_name(end1, to),
                injected_field_in_to: self.role_name(end0, from),
                cardinality: Cardinality::between(from_end, to_end),
                is_injected_field_in_from_required: to_end.is_required(),
                is_injected_field_in_to_required: from_end.is_required(),
                comment_in_from: self.format.comment(end1),
                comment_in_to: self.format.comment(end0),
            };
            self.model.add_association(association)?;
        }
        Ok(())
    }

    /// Role name of an end, or the name of the class it points at.
    fn role_name(&self, end: &Element, class_id: &str) -> String {
        match end.non_empty_attr("name") {
            Some(name) => helper::lower_first(name),
            None => self
                .model
                .model()
                .class(class_id)
                .map(|c| helper::lower_first(&c.name))
                .unwrap_or_else(|| helper::lower_first(class_id)),
        }
    }
}

fn index_ends<'d>(owner: &'d Element, child: &str, scan: &mut Buckets<'d>) {
    for end in owner.children_named(child) {
        if let Some(id) = end.id() {
            scan.ends.insert(id, end);
        }
    }
}

fn element_id(element: &Element) -> Result<&str, ParseError> {
    element.id().ok_or_else(|| {
        ParseError::UnsupportedFormat(format!(
            "{} '{}' has no xmi:id",
            element.xmi_type().unwrap_or(&element.name),
            element.attr("name").unwrap_or_default()
        ))
    })
}

fn end_class<'d>(association_id: &str, end: &'d Element) -> Result<&'d str, ParseError> {
    end.non_empty_attr("type").ok_or_else(|| {
        ParseError::UnsupportedFormat(format!(
            "an end of association '{}' has no type",
            association_id
        ))
    })
}
