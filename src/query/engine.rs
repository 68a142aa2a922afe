use crate::query::errors::QueryError;
use sxd_document::{dom, Package};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value, XPath};

/// A compiled path query.
///
/// Compiled XPath is not `Send`; threads that need the query compile their
/// own copy from [`Query::expression`].
pub struct Query {
    expression: String,
    xpath: XPath,
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("expression", &self.expression)
            .finish()
    }
}

impl Query {
    pub fn compile(expression: &str) -> Result<Self, QueryError> {
        let compile_error = |message: String| QueryError::Compile {
            expression: expression.to_string(),
            message,
        };

        let xpath = Factory::new()
            .build(expression)
            .map_err(|e| compile_error(e.to_string()))?
            .ok_or_else(|| compile_error("empty expression".to_string()))?;

        Ok(Self {
            expression: expression.to_string(),
            xpath,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluate against a loaded document; matches come back in document order.
    pub fn select<'d>(&self, document: &dom::Document<'d>) -> Result<Vec<Node<'d>>, QueryError> {
        let context = Context::new();
        let value = self
            .xpath
            .evaluate(&context, document.root())
            .map_err(|e| QueryError::Evaluate {
                message: e.to_string(),
            })?;

        match value {
            Value::Nodeset(nodes) => Ok(nodes.document_order()),
            Value::Boolean(_) => Err(self.not_nodeset("boolean")),
            Value::Number(_) => Err(self.not_nodeset("number")),
            Value::String(_) => Err(self.not_nodeset("string")),
        }
    }

    fn not_nodeset(&self, kind: &'static str) -> QueryError {
        QueryError::NotNodeset {
            expression: self.expression.clone(),
            kind,
        }
    }
}

/// Load a serialized markup document for querying.
pub fn load_document(markup: &str) -> Result<Package, QueryError> {
    sxd_document::parser::parse(markup).map_err(|e| QueryError::Document {
        message: format!("{e:?}"),
    })
}
