//! Modelio exports.
//!
//! The document root is the `uml:Model` itself, tagged with an `Objing`
//! annotation. Navigable association ends are owned by the classes and
//! referenced from the association's `memberEnd`. Comment bodies are text
//! elements rather than attributes.

use super::{Editor, Format};
use crate::document::Element;

pub(crate) struct Modelio;

impl Format for Modelio {
    fn editor(&self) -> Editor {
        Editor::Modelio
    }

    fn recognizes(&self, root: &Element) -> bool {
        root.name == "uml:Model"
            && root
                .children_named("eAnnotations")
                .any(|a| a.attr("source") == Some("Objing"))
    }

    fn model_root<'d>(&self, root: &'d Element) -> Option<&'d Element> {
        Some(root)
    }

    fn comment(&self, element: &Element) -> Option<String> {
        element
            .children_named("ownedComment")
            .find_map(|c| c.child("body").and_then(|b| b.text.clone()))
    }
}
