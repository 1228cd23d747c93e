//! Editor detection and parser selection.

use super::genmymodel::GenMyModel;
use super::modelio::Modelio;
use super::visual_paradigm::VisualParadigm;
use super::{Format, ParseError, Parser};
use crate::db::DatabaseType;
use crate::document::Element;

/// Modeling tools whose XMI exports can be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editor {
    Modelio,
    GenMyModel,
    VisualParadigm,
}

impl Editor {
    /// Detection order.
    pub const ALL: [Editor; 3] = [Self::Modelio, Self::GenMyModel, Self::VisualParadigm];

    /// Parse editor from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "modelio" => Some(Self::Modelio),
            "genmymodel" => Some(Self::GenMyModel),
            "visualparadigm" | "visual-paradigm" | "vp" => Some(Self::VisualParadigm),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Modelio => "Modelio",
            Self::GenMyModel => "GenMyModel",
            Self::VisualParadigm => "Visual Paradigm",
        }
    }

    pub(crate) fn format(self) -> &'static dyn Format {
        match self {
            Self::Modelio => &Modelio,
            Self::GenMyModel => &GenMyModel,
            Self::VisualParadigm => &VisualParadigm,
        }
    }

    /// Detect the editor that exported a document from its root element.
    pub fn detect(root: &Element) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|editor| editor.format().recognizes(root))
    }
}

/// Select the parser whose editor fingerprint matches the document.
pub fn create_parser(root: &Element, database: DatabaseType) -> Result<Parser<'_>, ParseError> {
    let editor = Editor::detect(root).ok_or_else(|| {
        ParseError::UnsupportedFormat(format!(
            "no supported editor exported this '{}' document",
            root.name
        ))
    })?;
    log::info!("detected {} export, database {}", editor.name(), database.name());
    Ok(Parser::new(root, editor, database))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated_model(source: &str) -> Element {
        Element::new("uml:Model")
            .with_child(Element::new("eAnnotations").with_attr("source", source))
    }

    #[test]
    fn test_detect_modelio() {
        assert_eq!(Editor::detect(&annotated_model("Objing")), Some(Editor::Modelio));
    }

    #[test]
    fn test_detect_genmymodel() {
        assert_eq!(
            Editor::detect(&annotated_model("http://www.genmymodel.com")),
            Some(Editor::GenMyModel)
        );
    }

    #[test]
    fn test_detect_visual_paradigm() {
        let root = Element::new("xmi:XMI").with_child(
            Element::new("xmi:Documentation")
                .with_attr("exporter", "Visual Paradigm")
                .with_attr("exporterVersion", "17.0"),
        );
        assert_eq!(Editor::detect(&root), Some(Editor::VisualParadigm));
    }

    #[test]
    fn test_unknown_document() {
        let root = Element::new("xmi:XMI").with_child(
            Element::new("xmi:Documentation").with_attr("exporter", "Enterprise Architect"),
        );
        assert_eq!(Editor::detect(&root), None);
        assert!(matches!(
            create_parser(&root, DatabaseType::Sql),
            Err(ParseError::UnsupportedFormat(_))
        ));
        assert_eq!(Editor::detect(&annotated_model("other")), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Editor::from_str("Modelio"), Some(Editor::Modelio));
        assert_eq!(Editor::from_str("vp"), Some(Editor::VisualParadigm));
        assert_eq!(Editor::from_str("argouml"), None);
    }
}
