//! Routine parameters, including cursor-shaped results.

use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::errors::Error;
use crate::expr::{SqlDataType, SqlExpr};
use crate::format::{FormatSql, output_list};
use crate::node::{Node, NodeMeta, adopt, adopt_all, release_all, swap_slot};
use crate::visitor::{Accept, Depth, Visitor, accept_child, accept_list, walk};

/// Direction of a routine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub enum ParameterType {
    /// No direction written.
    #[default]
    Default,
    /// `IN`.
    In,
    /// `OUT`.
    Out,
    /// `IN OUT`.
    InOut,
}

impl ParameterType {
    /// The direction keyword, if one was written.
    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::In => Some("IN"),
            Self::Out => Some("OUT"),
            Self::InOut => Some("IN OUT"),
        }
    }
}

/// A parameter of a procedure, function or cursor.
///
/// A parameter returning a cursor lists the cursor's own parameters in
/// [`Self::cursor_parameters`]. That list is only meaningful when the
/// parameter is an `OUT` or `IN OUT` cursor, which is a contract for
/// builders to keep: the model stores whatever it is given.
///
/// Cloning is deep and equality is structural over every field, nested
/// cursor parameters included.
#[derive(Debug, Default)]
pub struct Parameter {
    meta: NodeMeta,
    name: Option<SqlExpr>,
    data_type: Option<SqlDataType>,
    default_value: Option<SqlExpr>,
    param_type: ParameterType,
    no_copy: bool,
    constant: bool,
    cursor_name: Option<SqlExpr>,
    cursor_parameters: Vec<Parameter>,
}

impl Parameter {
    /// A parameter called `name` of type `data_type`.
    #[must_use]
    pub fn new(name: SqlExpr, data_type: SqlDataType) -> Self {
        let mut parameter = Self::default();
        parameter.set_name(Some(name));
        parameter.set_data_type(Some(data_type));
        parameter
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> Option<&SqlExpr> {
        self.name.as_ref()
    }

    /// Sets or clears the name, returning the previous one detached.
    pub fn set_name(&mut self, name: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.name, name)
    }

    /// The declared type.
    #[must_use]
    pub fn data_type(&self) -> Option<&SqlDataType> {
        self.data_type.as_ref()
    }

    /// Sets or clears the declared type, returning the previous one detached.
    pub fn set_data_type(&mut self, data_type: Option<SqlDataType>) -> Option<SqlDataType> {
        swap_slot(self.meta.id(), &mut self.data_type, data_type)
    }

    /// The default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&SqlExpr> {
        self.default_value.as_ref()
    }

    /// Sets or clears the default value, returning the previous one detached.
    pub fn set_default_value(&mut self, default_value: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.default_value, default_value)
    }

    /// The direction.
    #[must_use]
    pub fn param_type(&self) -> ParameterType {
        self.param_type
    }

    /// Changes the direction.
    pub fn set_param_type(&mut self, param_type: ParameterType) {
        self.param_type = param_type;
    }

    /// Whether `NOCOPY` was given.
    #[must_use]
    pub fn is_no_copy(&self) -> bool {
        self.no_copy
    }

    /// Sets the `NOCOPY` flag.
    pub fn set_no_copy(&mut self, no_copy: bool) {
        self.no_copy = no_copy;
    }

    /// Whether the parameter is `CONSTANT`.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Sets the `CONSTANT` flag.
    pub fn set_constant(&mut self, constant: bool) {
        self.constant = constant;
    }

    /// The name of the returned cursor.
    #[must_use]
    pub fn cursor_name(&self) -> Option<&SqlExpr> {
        self.cursor_name.as_ref()
    }

    /// Sets or clears the cursor name, returning the previous one detached.
    pub fn set_cursor_name(&mut self, cursor_name: Option<SqlExpr>) -> Option<SqlExpr> {
        swap_slot(self.meta.id(), &mut self.cursor_name, cursor_name)
    }

    /// The parameters of the returned cursor, in order.
    #[must_use]
    pub fn cursor_parameters(&self) -> &[Parameter] {
        &self.cursor_parameters
    }

    /// Appends a cursor parameter.
    pub fn add_cursor_parameter(&mut self, parameter: Parameter) {
        self.cursor_parameters
            .push(adopt(self.meta.id(), parameter));
    }

    /// Replaces the cursor parameters, returning the previous ones detached.
    pub fn set_cursor_parameters(&mut self, mut parameters: Vec<Parameter>) -> Vec<Parameter> {
        adopt_all(self.meta.id(), &mut parameters);
        release_all(core::mem::replace(&mut self.cursor_parameters, parameters))
    }

    /// Whether cursor metadata is present.
    #[must_use]
    pub fn is_cursor(&self) -> bool {
        self.cursor_name.is_some() || !self.cursor_parameters.is_empty()
    }
}

impl Clone for Parameter {
    fn clone(&self) -> Self {
        let mut cloned = Self {
            param_type: self.param_type,
            no_copy: self.no_copy,
            constant: self.constant,
            ..Self::default()
        };
        cloned.set_name(self.name.clone());
        cloned.set_data_type(self.data_type.clone());
        cloned.set_default_value(self.default_value.clone());
        cloned.set_cursor_name(self.cursor_name.clone());
        cloned.set_cursor_parameters(self.cursor_parameters.clone());
        cloned
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.data_type == other.data_type
            && self.default_value == other.default_value
            && self.param_type == other.param_type
            && self.no_copy == other.no_copy
            && self.constant == other.constant
            && self.cursor_name == other.cursor_name
            && self.cursor_parameters == other.cursor_parameters
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.data_type.hash(state);
        self.default_value.hash(state);
        self.param_type.hash(state);
        self.no_copy.hash(state);
        self.constant.hash(state);
        self.cursor_name.hash(state);
        self.cursor_parameters.hash(state);
    }
}

impl Node for Parameter {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

impl FormatSql for Parameter {
    fn output(&self, buf: &mut String) {
        if let Some(name) = &self.name {
            name.output(buf);
            buf.push(' ');
        }
        if let Some(keyword) = self.param_type.keyword() {
            buf.push_str(keyword);
            buf.push(' ');
        }
        if self.no_copy {
            buf.push_str("NOCOPY ");
        }
        if self.constant {
            buf.push_str("CONSTANT ");
        }
        if let Some(data_type) = &self.data_type {
            data_type.output(buf);
        }
        if let Some(cursor_name) = &self.cursor_name {
            buf.push_str("CURSOR ");
            cursor_name.output(buf);
            if !self.cursor_parameters.is_empty() {
                buf.push_str(" (");
                output_list(&self.cursor_parameters, buf);
                buf.push(')');
            }
        }
        if let Some(default_value) = &self.default_value {
            buf.push_str(" DEFAULT ");
            default_value.output(buf);
        }
    }
}

impl Accept for Parameter {
    fn accept_at(&self, visitor: &mut dyn Visitor, depth: Depth) -> Result<(), Error> {
        walk(
            visitor,
            self,
            depth,
            |v| v.visit_parameter(self),
            |v, depth| {
                accept_child(v, self.name.as_ref(), depth)?;
                accept_child(v, self.data_type.as_ref(), depth)?;
                accept_child(v, self.default_value.as_ref(), depth)?;
                accept_child(v, self.cursor_name.as_ref(), depth)?;
                accept_list(v, &self.cursor_parameters, depth)
            },
            |v| v.end_visit_parameter(self),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out_cursor() -> Parameter {
        let mut parameter = Parameter::default();
        parameter.set_name(Some(SqlExpr::identifier("result")));
        parameter.set_param_type(ParameterType::Out);
        parameter.set_cursor_name(Some(SqlExpr::identifier("orders_cur")));
        let mut nested = Parameter::new(
            SqlExpr::identifier("customer_id"),
            SqlDataType::new("NUMBER"),
        );
        nested.set_param_type(ParameterType::In);
        parameter.add_cursor_parameter(nested);
        parameter
    }

    #[test]
    fn test_clone_preserves_nested_parameters() {
        let parameter = out_cursor();
        let cloned = parameter.clone();
        assert_eq!(cloned, parameter);
        assert_eq!(cloned.cursor_parameters().len(), 1);

        let nested = &cloned.cursor_parameters()[0];
        assert_eq!(nested.param_type(), ParameterType::In);
        assert_eq!(
            nested.name().and_then(SqlExpr::simple_name),
            Some("customer_id")
        );
        assert_eq!(nested.parent(), Some(cloned.node_id()));
        assert_ne!(nested.node_id(), parameter.cursor_parameters()[0].node_id());
    }

    #[test]
    fn test_clone_is_independent() {
        let parameter = out_cursor();
        let mut cloned = parameter.clone();
        cloned.set_no_copy(true);
        cloned.add_cursor_parameter(Parameter::default());
        assert_ne!(cloned, parameter);
        assert_eq!(parameter.cursor_parameters().len(), 1);
        assert!(!parameter.is_no_copy());
    }

    #[test]
    fn test_is_cursor() {
        assert!(out_cursor().is_cursor());
        let plain = Parameter::new(SqlExpr::identifier("p"), SqlDataType::new("INT"));
        assert!(!plain.is_cursor());
    }

    #[test]
    fn test_set_cursor_parameters_relinks() {
        let mut parameter = out_cursor();
        let previous = parameter.set_cursor_parameters(alloc::vec![Parameter::default()]);
        assert_eq!(previous.len(), 1);
        assert!(previous[0].parent().is_none());
        assert_eq!(
            parameter.cursor_parameters()[0].parent(),
            Some(parameter.node_id())
        );
    }

    #[test]
    fn test_output() {
        let mut parameter =
            Parameter::new(SqlExpr::identifier("p_limit"), SqlDataType::new("NUMBER"));
        parameter.set_param_type(ParameterType::InOut);
        parameter.set_no_copy(true);
        parameter.set_default_value(Some(SqlExpr::literal(10)));
        assert_eq!(
            parameter.format_sql(),
            "p_limit IN OUT NOCOPY NUMBER DEFAULT 10"
        );
        assert_eq!(
            out_cursor().format_sql(),
            "result OUT CURSOR orders_cur (customer_id IN NUMBER)"
        );
    }
}
