//! GenMyModel exports.
//!
//! The root `uml:Model` carries an annotation whose source names
//! GenMyModel. Associations own their ends as `ownedEnd` children and
//! comments keep their text in a `body` attribute.

use super::{Editor, Format};
use crate::document::Element;

pub(crate) struct GenMyModel;

impl Format for GenMyModel {
    fn editor(&self) -> Editor {
        Editor::GenMyModel
    }

    fn recognizes(&self, root: &Element) -> bool {
        root.name == "uml:Model"
            && root.children_named("eAnnotations").any(|a| {
                a.attr("source")
                    .is_some_and(|s| s.to_lowercase().contains("genmymodel"))
            })
    }

    fn model_root<'d>(&self, root: &'d Element) -> Option<&'d Element> {
        Some(root)
    }

    fn comment(&self, element: &Element) -> Option<String> {
        element
            .children_named("ownedComment")
            .find_map(|c| c.non_empty_attr("body"))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_body_attribute() {
        let attribute = Element::new("ownedAttribute")
            .with_child(Element::new("ownedComment").with_attr("body", " Display name "));
        assert_eq!(GenMyModel.comment(&attribute), Some("Display name".into()));
    }

    #[test]
    fn test_source_match_ignores_case() {
        let root = Element::new("uml:Model")
            .with_child(Element::new("eAnnotations").with_attr("source", "GenMyModel"));
        assert!(GenMyModel.recognizes(&root));
    }
}
