// File: rusty-forms-validate/src/functions/field_value.rs
// Purpose: Extract a normalized value from any kind of form control

use crate::dom::{Control, ControlKind, FileInfo};
use crate::error::{Result, ValidateError};

/// The value a rule validates
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text-like inputs, single selects and radio groups
    Text(String),
    /// Checkbox groups and multi-selects, in document order
    List(Vec<String>),
    /// Selected files
    Files(Vec<FileInfo>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Number of characters for text, number of entries otherwise
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Text(s) => s.chars().count(),
            FieldValue::List(items) => items.len(),
            FieldValue::Files(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Resolves control values and decides emptiness
pub trait FieldValueResolver {
    fn resolve(&self, control: &dyn Control) -> Result<FieldValue>;

    /// Blank text or an empty list
    fn is_empty(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Text(s) => s.trim().is_empty(),
            other => other.is_empty(),
        }
    }
}

/// Dispatches on [`ControlKind`]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFieldValueResolver;

impl FieldValueResolver for DefaultFieldValueResolver {
    fn resolve(&self, control: &dyn Control) -> Result<FieldValue> {
        match control.kind() {
            ControlKind::Radio => {
                let checked = checked_in_group(control)?;
                Ok(FieldValue::Text(checked.into_iter().next().unwrap_or_default()))
            }
            ControlKind::Checkbox => Ok(FieldValue::List(checked_in_group(control)?)),
            ControlKind::File => Ok(FieldValue::Files(control.files())),
            ControlKind::Select { multiple: true } => Ok(FieldValue::List(control.selected_values())),
            ControlKind::Select { multiple: false }
            | ControlKind::Text(_)
            | ControlKind::TextArea => Ok(FieldValue::Text(control.value())),
        }
    }
}

/// Values of the checked same-kind, same-name controls of the owning form
fn checked_in_group(control: &dyn Control) -> Result<Vec<String>> {
    let form = control.form().ok_or(ValidateError::FormRequired)?;
    let kind = control.kind();
    let name = control.name();
    Ok(form
        .elements()
        .into_iter()
        .filter(|el| el.kind() == kind && el.name() == name && el.checked())
        .map(|el| el.value())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::headless::HeadlessDocument;
    use crate::dom::InputType;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_radio_group() {
        let doc = HeadlessDocument::new();
        let form = doc.create_form("f");
        let a = doc.create_control(ControlKind::Radio, "a", "plan");
        let b = doc.create_control(ControlKind::Radio, "b", "plan");
        a.set_value("free");
        b.set_value("pro");
        form.append(&a);
        form.append(&b);

        let resolver = DefaultFieldValueResolver;
        assert_eq!(resolver.resolve(&*a).unwrap(), FieldValue::from(""));

        b.set_checked(true);
        assert_eq!(resolver.resolve(&*a).unwrap(), FieldValue::from("pro"));
    }

    #[test]
    fn test_checkbox_group_in_document_order() {
        let doc = HeadlessDocument::new();
        let form = doc.create_form("f");
        let names = ["red", "green", "blue"];
        let boxes: Vec<_> = names
            .iter()
            .map(|n| {
                let c = doc.create_control(ControlKind::Checkbox, n, "colors");
                c.set_value(n);
                form.append(&c);
                c
            })
            .collect();
        boxes[2].set_checked(true);
        boxes[0].set_checked(true);

        let value = DefaultFieldValueResolver.resolve(&*boxes[1]).unwrap();
        assert_eq!(value, FieldValue::List(vec!["red".into(), "blue".into()]));
    }

    #[test]
    fn test_group_without_form_fails() {
        let doc = HeadlessDocument::new();
        let lonely = doc.create_control(ControlKind::Checkbox, "c", "c");
        assert!(matches!(
            DefaultFieldValueResolver.resolve(&*lonely),
            Err(ValidateError::FormRequired)
        ));
    }

    #[test]
    fn test_selects_and_files() {
        let doc = HeadlessDocument::new();
        let single = doc.create_control(ControlKind::Select { multiple: false }, "s", "s");
        single.add_option("", true);
        single.add_option("a", false);
        assert_eq!(DefaultFieldValueResolver.resolve(&*single).unwrap(), FieldValue::from(""));
        single.select(&["a"]);
        assert_eq!(DefaultFieldValueResolver.resolve(&*single).unwrap(), FieldValue::from("a"));

        let multi = doc.create_control(ControlKind::Select { multiple: true }, "m", "m");
        for v in ["x", "y", "z"] {
            multi.add_option(v, false);
        }
        multi.select(&["z", "x"]);
        assert_eq!(
            DefaultFieldValueResolver.resolve(&*multi).unwrap(),
            FieldValue::List(vec!["x".into(), "z".into()])
        );

        let file = doc.create_control(ControlKind::File, "f", "f");
        assert_eq!(DefaultFieldValueResolver.resolve(&*file).unwrap(), FieldValue::Files(vec![]));
        file.set_files(vec![FileInfo::new("a.png", 10, "image/png")]);
        assert_eq!(DefaultFieldValueResolver.resolve(&*file).unwrap().len(), 1);
    }

    #[rstest]
    #[case(FieldValue::from(""), true)]
    #[case(FieldValue::from("   "), true)]
    #[case(FieldValue::from("0"), false)]
    #[case(FieldValue::List(vec![]), true)]
    #[case(FieldValue::List(vec!["".into()]), false)]
    #[case(FieldValue::Files(vec![]), true)]
    fn test_is_empty(#[case] value: FieldValue, #[case] empty: bool) {
        assert_eq!(DefaultFieldValueResolver.is_empty(&value), empty);
    }

    #[test]
    fn test_text_value() {
        let doc = HeadlessDocument::new();
        let input = doc.create_control(ControlKind::Text(InputType::Email), "e", "e");
        input.set_value("a@b.co");
        assert_eq!(DefaultFieldValueResolver.resolve(&*input).unwrap(), FieldValue::from("a@b.co"));
    }
}
