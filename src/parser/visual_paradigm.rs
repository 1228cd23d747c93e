//! Visual Paradigm exports.
//!
//! The root is an `xmi:XMI` envelope whose `xmi:Documentation` names the
//! exporter; the diagram sits in a nested `uml:Model`. Attribute types are
//! often written as a `type` child pointing at a data type by `xmi:idref`.

use super::{Editor, Format, TypeRef};
use crate::document::Element;

pub(crate) struct VisualParadigm;

impl Format for VisualParadigm {
    fn editor(&self) -> Editor {
        Editor::VisualParadigm
    }

    fn recognizes(&self, root: &Element) -> bool {
        root.name == "xmi:XMI"
            && root
                .child("xmi:Documentation")
                .and_then(|d| d.attr("exporter"))
                .is_some_and(|e| e.starts_with("Visual Paradigm"))
    }

    fn model_root<'d>(&self, root: &'d Element) -> Option<&'d Element> {
        root.child("uml:Model")
    }

    fn comment(&self, element: &Element) -> Option<String> {
        element.children_named("ownedComment").find_map(|c| {
            c.non_empty_attr("body")
                .map(str::to_string)
                .or_else(|| c.child("body").and_then(|b| b.text.clone()))
        })
    }

    fn attribute_type<'d>(&self, attribute: &'d Element) -> TypeRef<'d> {
        if let Some(id) = attribute.non_empty_attr("type") {
            return TypeRef::Inline(id);
        }
        let Some(ty) = attribute.child("type") else {
            return TypeRef::Missing;
        };
        if let Some(id) = ty.non_empty_attr("xmi:idref") {
            TypeRef::Inline(id)
        } else if let Some(href) = ty.non_empty_attr("href") {
            TypeRef::Href(href)
        } else {
            TypeRef::Missing
        }
    }
}
