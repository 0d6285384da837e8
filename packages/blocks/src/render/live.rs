//! Live form: the submission-time view of a form
//!
//! Every field block becomes a [`LiveField`] that owns only its current
//! value and a validity flag. Input events are routed to the field by block
//! id; the field reports the resulting raw string value upward through the
//! `report(block_id, value)` callback. Fields never see their siblings.

use super::{field_label, helper_text, VNode};
use crate::block::BlockInstance;
use crate::document::FormDocument;
use crate::registry::Registry;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

pub const REQUIRED_MESSAGE: &str = "This field is required";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One interactive input in the live form
pub trait LiveField: fmt::Debug {
    fn block_id(&self) -> &str;

    /// Handle one user input event and report the resulting value
    fn input(&mut self, raw: &str, report: &mut dyn FnMut(&str, &str));

    /// Current value in submitted form
    fn value(&self) -> String;

    fn is_valid(&self) -> bool;

    /// Markup, with an error from a rejected submit if there was one
    fn view(&self, submit_error: Option<&str>) -> VNode;
}

/// Node of the live form produced by a block definition
#[derive(Debug)]
pub enum FormElement {
    /// Presentational block, no input
    Static(VNode),
    Input(Box<dyn LiveField>),
    /// Layout block holding its children's elements
    Group {
        block_id: String,
        children: Vec<FormElement>,
    },
}

impl FormElement {
    fn find_field_mut(&mut self, id: &str) -> Option<&mut Box<dyn LiveField>> {
        match self {
            FormElement::Input(field) if field.block_id() == id => Some(field),
            FormElement::Group { children, .. } => {
                children.iter_mut().find_map(|c| c.find_field_mut(id))
            }
            _ => None,
        }
    }

    fn find_field(&self, id: &str) -> Option<&dyn LiveField> {
        match self {
            FormElement::Input(field) if field.block_id() == id => Some(field.as_ref()),
            FormElement::Group { children, .. } => children.iter().find_map(|c| c.find_field(id)),
            _ => None,
        }
    }

    fn fields<'a>(&'a self, out: &mut Vec<&'a dyn LiveField>) {
        match self {
            FormElement::Input(field) => out.push(field.as_ref()),
            FormElement::Group { children, .. } => {
                for child in children {
                    child.fields(out);
                }
            }
            FormElement::Static(_) => {}
        }
    }

    fn view(&self, errors: &BTreeMap<String, String>) -> VNode {
        match self {
            FormElement::Static(node) => node.clone(),
            FormElement::Input(field) => {
                field.view(errors.get(field.block_id()).map(String::as_str))
            }
            FormElement::Group { block_id, children } => VNode::element("div")
                .with_class("form-row")
                .with_block_id(block_id)
                .with_children(children.iter().map(|c| c.view(errors)).collect()),
        }
    }
}

/// The live form of a whole document
#[derive(Debug)]
pub struct LiveForm {
    elements: Vec<FormElement>,
}

impl LiveForm {
    pub fn build(doc: &FormDocument, registry: &Registry) -> Self {
        Self {
            elements: doc
                .blocks
                .iter()
                .map(|block| render_form_block(block, registry))
                .collect(),
        }
    }

    /// Route an input event to the field with `block_id`
    ///
    /// Returns `false` when no input field has that id.
    pub fn input(&mut self, block_id: &str, raw: &str, report: &mut dyn FnMut(&str, &str)) -> bool {
        match self
            .elements
            .iter_mut()
            .find_map(|e| e.find_field_mut(block_id))
        {
            Some(field) => {
                field.input(raw, report);
                true
            }
            None => {
                debug!(block_id, "input for unknown field ignored");
                false
            }
        }
    }

    pub fn field(&self, block_id: &str) -> Option<&dyn LiveField> {
        self.elements.iter().find_map(|e| e.find_field(block_id))
    }

    /// All input fields in document order
    pub fn fields(&self) -> Vec<&dyn LiveField> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.fields(&mut out);
        }
        out
    }

    /// Non-empty values keyed by block id, in document order
    pub fn values(&self) -> Vec<(String, String)> {
        self.fields()
            .into_iter()
            .map(|f| (f.block_id().to_string(), f.value()))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    pub fn view(&self, errors: &BTreeMap<String, String>) -> Vec<VNode> {
        self.elements.iter().map(|e| e.view(errors)).collect()
    }
}

/// Dispatch one block to its definition's live-form renderer
pub fn render_form_block(block: &BlockInstance, registry: &Registry) -> FormElement {
    match registry.lookup(block.block_type) {
        Ok(definition) => definition.render_form(block, registry),
        Err(err) => FormElement::Static(VNode::text(err.to_string())),
    }
}

fn field_frame(block: &BlockInstance, invalid: bool) -> VNode {
    let class = if invalid { "form-field has-error" } else { "form-field" };
    VNode::element("div")
        .with_class(class)
        .with_block_id(&block.id)
        .with_child(field_label(block))
}

fn with_error(node: VNode, own_error: bool, submit_error: Option<&str>) -> VNode {
    let message = if own_error { Some(REQUIRED_MESSAGE) } else { submit_error };
    match message {
        Some(message) => node.with_child(
            VNode::element("p")
                .with_class("field-error")
                .with_child(VNode::text(message)),
        ),
        None => node,
    }
}

fn with_helper(node: VNode, block: &BlockInstance) -> VNode {
    match helper_text(block) {
        Some(helper) => node.with_child(helper),
        None => node,
    }
}

/// Single- or multi-line free text
#[derive(Debug)]
pub struct TextInput {
    block: BlockInstance,
    multiline: bool,
    value: String,
    valid: bool,
}

impl TextInput {
    pub fn new(block: &BlockInstance, multiline: bool) -> Self {
        Self {
            block: block.clone(),
            multiline,
            value: String::new(),
            valid: true,
        }
    }
}

impl LiveField for TextInput {
    fn block_id(&self) -> &str {
        &self.block.id
    }

    fn input(&mut self, raw: &str, report: &mut dyn FnMut(&str, &str)) {
        self.value = raw.to_string();
        self.valid = !(self.block.is_required() && raw.trim().is_empty());
        report(&self.block.id, raw);
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn view(&self, submit_error: Option<&str>) -> VNode {
        let placeholder = self.block.attr_str("placeholder").unwrap_or_default();
        let input = if self.multiline {
            let rows = self.block.attr_u64("rows").unwrap_or(3);
            VNode::element("textarea")
                .with_attr("rows", rows.to_string())
                .with_attr("placeholder", placeholder)
                .with_child(VNode::text(&self.value))
        } else {
            VNode::element("input")
                .with_attr("type", "text")
                .with_attr("placeholder", placeholder)
                .with_attr("value", &self.value)
        };
        let node = field_frame(&self.block, !self.valid || submit_error.is_some())
            .with_child(input.with_attr("name", &self.block.id));
        with_error(with_helper(node, &self.block), !self.valid, submit_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    /// All options visible as radio buttons / check boxes
    Buttons,
    Dropdown,
}

/// Pick one or several of a block's `options`
///
/// Multi-select toggles the clicked option. Single select is exclusive:
/// clicking an option selects it, clicking it again keeps it selected.
#[derive(Debug)]
pub struct ChoiceInput {
    block: BlockInstance,
    style: ChoiceStyle,
    selected: Vec<String>,
    valid: bool,
}

impl ChoiceInput {
    pub fn new(block: &BlockInstance, style: ChoiceStyle) -> Self {
        Self {
            block: block.clone(),
            style,
            selected: Vec::new(),
            valid: true,
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    fn allow_multiple(&self) -> bool {
        self.block.attr_bool("allowMultiple")
    }
}

impl LiveField for ChoiceInput {
    fn block_id(&self) -> &str {
        &self.block.id
    }

    fn input(&mut self, raw: &str, report: &mut dyn FnMut(&str, &str)) {
        if !self.block.attr_list("options").contains(&raw) {
            debug!(block_id = %self.block.id, option = raw, "not one of the options");
            return;
        }

        if self.allow_multiple() {
            if let Some(pos) = self.selected.iter().position(|s| s == raw) {
                self.selected.remove(pos);
            } else {
                self.selected.push(raw.to_string());
            }
        } else {
            self.selected = vec![raw.to_string()];
        }

        self.valid = !(self.block.is_required() && self.selected.is_empty());
        report(&self.block.id, &self.selected.join(","));
    }

    fn value(&self) -> String {
        self.selected.join(",")
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn view(&self, submit_error: Option<&str>) -> VNode {
        let options = self.block.attr_list("options");
        let multiple = self.allow_multiple();

        let control = match self.style {
            ChoiceStyle::Buttons => {
                let kind = if multiple { "checkbox" } else { "radio" };
                VNode::element("div").with_class("options").with_children(
                    options
                        .iter()
                        .map(|option| {
                            VNode::element("label")
                                .with_child(
                                    VNode::element("input")
                                        .with_attr("type", kind)
                                        .with_attr("name", &self.block.id)
                                        .with_attr("value", *option)
                                        .with_flag(
                                            "checked",
                                            self.selected.iter().any(|s| s == option),
                                        ),
                                )
                                .with_child(VNode::text(*option))
                        })
                        .collect(),
                )
            }
            ChoiceStyle::Dropdown => {
                let placeholder = self.block.attr_str("placeholder").unwrap_or_default();
                let mut select = VNode::element("select")
                    .with_attr("name", &self.block.id)
                    .with_flag("multiple", multiple)
                    .with_child(
                        VNode::element("option")
                            .with_attr("value", "")
                            .with_child(VNode::text(placeholder)),
                    );
                for option in &options {
                    select = select.with_child(
                        VNode::element("option")
                            .with_attr("value", *option)
                            .with_flag("selected", self.selected.iter().any(|s| s == option))
                            .with_child(VNode::text(*option)),
                    );
                }
                select
            }
        };

        let node = field_frame(&self.block, !self.valid || submit_error.is_some()).with_child(control);
        with_error(with_helper(node, &self.block), !self.valid, submit_error)
    }
}

/// Star count between 1 and the block's `maxStars`
#[derive(Debug)]
pub struct RatingInput {
    block: BlockInstance,
    rating: u64,
    valid: bool,
}

impl RatingInput {
    pub fn new(block: &BlockInstance) -> Self {
        Self {
            block: block.clone(),
            rating: 0,
            valid: true,
        }
    }

    fn max_stars(&self) -> u64 {
        self.block.attr_u64("maxStars").unwrap_or(5)
    }
}

impl LiveField for RatingInput {
    fn block_id(&self) -> &str {
        &self.block.id
    }

    fn input(&mut self, raw: &str, report: &mut dyn FnMut(&str, &str)) {
        match raw.trim().parse::<u64>() {
            Ok(n) if (1..=self.max_stars()).contains(&n) => {
                self.rating = n;
                self.valid = true;
                report(&self.block.id, &n.to_string());
            }
            _ => self.valid = false,
        }
    }

    fn value(&self) -> String {
        if self.rating == 0 {
            String::new()
        } else {
            self.rating.to_string()
        }
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn view(&self, submit_error: Option<&str>) -> VNode {
        let stars = (1..=self.max_stars())
            .map(|n| {
                VNode::element("button")
                    .with_attr("type", "button")
                    .with_attr("value", n.to_string())
                    .with_flag("data-filled", n <= self.rating)
                    .with_child(VNode::text("★"))
            })
            .collect();
        let node = field_frame(&self.block, !self.valid || submit_error.is_some())
            .with_child(VNode::element("div").with_class("stars").with_children(stars));
        with_error(with_helper(node, &self.block), !self.valid, submit_error)
    }
}

/// Calendar date, reported as `YYYY-MM-DD`
#[derive(Debug)]
pub struct DateInput {
    block: BlockInstance,
    date: Option<NaiveDate>,
    valid: bool,
}

impl DateInput {
    pub fn new(block: &BlockInstance) -> Self {
        Self {
            block: block.clone(),
            date: None,
            valid: true,
        }
    }
}

impl LiveField for DateInput {
    fn block_id(&self) -> &str {
        &self.block.id
    }

    fn input(&mut self, raw: &str, report: &mut dyn FnMut(&str, &str)) {
        let raw = raw.trim();
        if raw.is_empty() {
            self.date = None;
            self.valid = !self.block.is_required();
            return;
        }
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => {
                self.date = Some(date);
                self.valid = true;
                report(&self.block.id, &date.format(DATE_FORMAT).to_string());
            }
            Err(_) => self.valid = false,
        }
    }

    fn value(&self) -> String {
        self.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn view(&self, submit_error: Option<&str>) -> VNode {
        let placeholder = self.block.attr_str("placeholder").unwrap_or_default();
        let input = VNode::element("input")
            .with_attr("type", "date")
            .with_attr("name", &self.block.id)
            .with_attr("placeholder", placeholder)
            .with_attr("value", self.value());
        let node = field_frame(&self.block, !self.valid || submit_error.is_some()).with_child(input);
        with_error(with_helper(node, &self.block), !self.valid, submit_error)
    }
}

/// File upload; the uploaded file's URL is the value
#[derive(Debug)]
pub struct MediaInput {
    block: BlockInstance,
    url: String,
    valid: bool,
}

impl MediaInput {
    pub fn new(block: &BlockInstance) -> Self {
        Self {
            block: block.clone(),
            url: String::new(),
            valid: true,
        }
    }
}

impl LiveField for MediaInput {
    fn block_id(&self) -> &str {
        &self.block.id
    }

    fn input(&mut self, raw: &str, report: &mut dyn FnMut(&str, &str)) {
        self.url = raw.trim().to_string();
        self.valid = !(self.block.is_required() && self.url.is_empty());
        if !self.url.is_empty() {
            report(&self.block.id, &self.url);
        }
    }

    fn value(&self) -> String {
        self.url.clone()
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn view(&self, submit_error: Option<&str>) -> VNode {
        let accept = self.block.attr_list("acceptedTypes").join(",");
        let max = self.block.attr_f64("maxFileSize").unwrap_or(5.0);
        let mut node = field_frame(&self.block, !self.valid || submit_error.is_some()).with_child(
            VNode::element("input")
                .with_attr("type", "file")
                .with_attr("name", &self.block.id)
                .with_attr("accept", accept)
                .with_attr("data-max-mb", max.to_string()),
        );
        if !self.url.is_empty() {
            node = node.with_child(
                VNode::element("a")
                    .with_attr("href", &self.url)
                    .with_child(VNode::text("Uploaded file")),
            );
        }
        with_error(node, !self.valid, submit_error)
    }
}

/// Live-form rendering for a block with no input of its own
pub fn static_element(block: &BlockInstance, node: VNode) -> FormElement {
    FormElement::Static(node.with_block_id(&block.id))
}
