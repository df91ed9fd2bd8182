//! Rendered UI as plain data.
//!
//! Every component renders into [`Element`]s. A [`Page`] can be inspected
//! (tests, scripting) or printed to a terminal through `Display`.

use concordium_client::ConnectorType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Danger,
    Warning,
    Secondary,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleConnector(ConnectorType),
    Connect,
    Donate,
    CloseDonation,
    RefreshView,
    ReselectContract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
    pub disabled: bool,
    pub active: bool,
}

impl Button {
    #[must_use]
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
            disabled: false,
            active: false,
        }
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
    /// Rendered as monospace code.
    pub code: bool,
}

impl DetailRow {
    #[must_use]
    pub fn code(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            code: true,
        }
    }

    #[must_use]
    pub fn text(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            code: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Navbar { brand: String, buttons: Vec<Button> },
    Alert { variant: AlertVariant, title: String, items: Vec<String> },
    Spinner,
    Button(Button),
    Details { variant: AlertVariant, rows: Vec<DetailRow> },
    Text(String),
    Link { label: String, href: String },
    Columns(Vec<Vec<Element>>),
}

impl Element {
    #[must_use]
    pub fn alert(variant: AlertVariant, title: impl Into<String>) -> Self {
        Self::Alert {
            variant,
            title: title.into(),
            items: Vec::new(),
        }
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        if let Self::Columns(columns) = self {
            for element in columns.iter().flatten() {
                element.walk(out);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    /// All elements, columns flattened, in render order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.walk(&mut out);
        }
        out
    }

    #[must_use]
    pub fn button(&self, action: Action) -> Option<&Button> {
        self.flatten().into_iter().find_map(|element| match element {
            Element::Button(button) if button.action == action => Some(button),
            Element::Navbar { buttons, .. } => buttons.iter().find(|b| b.action == action),
            _ => None,
        })
    }

    #[must_use]
    pub fn alerts(&self, variant: AlertVariant) -> Vec<&str> {
        self.flatten()
            .into_iter()
            .filter_map(|element| match element {
                Element::Alert { variant: v, title, .. } if *v == variant => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn has_spinner(&self) -> bool {
        self.flatten().iter().any(|e| matches!(e, Element::Spinner))
    }

    /// Value of the first details row with the given label.
    #[must_use]
    pub fn detail(&self, label: &str) -> Option<&str> {
        self.flatten().into_iter().find_map(|element| match element {
            Element::Details { rows, .. } => rows
                .iter()
                .find(|row| row.label == label)
                .map(|row| row.value.as_str()),
            _ => None,
        })
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, element: &Element, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match element {
        Element::Navbar { brand, buttons } => {
            write!(f, "{pad}== {brand} ==")?;
            for button in buttons {
                write!(f, " {}", render_button(button))?;
            }
            writeln!(f)
        }
        Element::Alert { variant, title, items } => {
            writeln!(f, "{pad}[{}] {title}", variant_label(*variant))?;
            for item in items {
                writeln!(f, "{pad}  - {item}")?;
            }
            Ok(())
        }
        Element::Spinner => writeln!(f, "{pad}... loading"),
        Element::Button(button) => writeln!(f, "{pad}{}", render_button(button)),
        Element::Details { rows, .. } => {
            let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
            for row in rows {
                let value = if row.code {
                    format!("`{}`", row.value)
                } else {
                    row.value.clone()
                };
                writeln!(f, "{pad}{:<width$} {value}", row.label)?;
            }
            Ok(())
        }
        Element::Text(text) => writeln!(f, "{pad}{text}"),
        Element::Link { label, href } => writeln!(f, "{pad}{label} <{href}>"),
        Element::Columns(columns) => {
            for column in columns {
                for element in column {
                    write_element(f, element, indent + 1)?;
                }
                writeln!(f)?;
            }
            Ok(())
        }
    }
}

fn render_button(button: &Button) -> String {
    let marker = if button.active { "*" } else { "" };
    if button.disabled {
        format!("({}{marker}, disabled)", button.label)
    } else {
        format!("[{}{marker}]", button.label)
    }
}

const fn variant_label(variant: AlertVariant) -> &'static str {
    match variant {
        AlertVariant::Danger => "error",
        AlertVariant::Warning => "warning",
        AlertVariant::Secondary => "info",
        AlertVariant::Success => "ok",
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write_element(f, element, 0)?;
        }
        Ok(())
    }
}
